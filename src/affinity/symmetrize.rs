use ndarray::Array2;

/*
  Symmetrize row-wise conditional affinities into a joint affinity matrix:

      joint = (P^T + P) / (2 * n)

  Every conditional row sums to 1, so the joint matrix carries total mass 1
  across all entries. Must run only after every row of P has reached its
  terminal state.

  Parameters
  ----------
  conditional: array of shape (n_points, n_points)
      Row-wise conditional distributions with zero diagonal.

  Returns
  -------
  joint: array of shape (n_points, n_points)
      Symmetric, non-negative, zero-diagonal joint affinities.
*/
pub fn symmetrize(conditional: &Array2<f32>) -> Array2<f32> {
  let n_points = conditional.nrows();
  if n_points == 0 {
    return conditional.clone();
  }

  let mut joint = conditional.t().to_owned();
  joint += conditional;
  joint /= 2.0 * n_points as f32;
  joint
}
