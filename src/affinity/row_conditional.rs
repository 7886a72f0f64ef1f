/*
  Compute the Gaussian conditional neighbor distribution of a single point
  and its Shannon entropy.

  Parameters
  ----------
  distances: slice of shape (n_neighbors)
      Squared distances from the point to every other point, with the
      self-distance already removed.

  precision: float
      Gaussian precision (inverse variance) of the point's kernel. Higher
      precision concentrates the distribution on the nearest neighbors.

  Returns
  -------
  entropy: float
      Shannon entropy -sum(p * ln(p)) of the distribution.

  probabilities: vec of shape (n_neighbors)
      The conditional distribution over the neighbors, summing to 1.
*/
pub fn conditional_row(distances: &[f32], precision: f32) -> (f32, Vec<f32>) {
  if distances.is_empty() {
    return (0.0, Vec::new());
  }

  // Shift every exponent by the smallest distance so the largest weight is
  // exp(0) = 1. The shift cancels in the normalization and keeps exp from
  // underflowing to an all-zero row at high precision.
  let min_dist = distances.iter().copied().fold(f32::INFINITY, f32::min);

  let weights: Vec<f32> = distances
    .iter()
    .map(|&d| f32::exp(-(d - min_dist) * precision))
    .collect();
  let total: f32 = weights.iter().sum();

  let mut entropy = 0.0;
  let probabilities: Vec<f32> = weights
    .iter()
    .map(|&w| {
      let p = w / total;
      if p > 0.0 {
        entropy -= p * f32::ln(p);
      }
      p
    })
    .collect();

  (entropy, probabilities)
}
