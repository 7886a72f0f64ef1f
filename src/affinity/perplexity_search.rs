use super::constants::ENTROPY_TOLERANCE;
use super::constants::INITIAL_PRECISION;
use super::constants::MAX_SEARCH_ITERATIONS;
use super::row_conditional::conditional_row;
use crate::error::AffinityError;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView2;
use rayon::prelude::*;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder, Debug)]
pub struct PerplexitySearch<'a> {
  distances: ArrayView2<'a, f32>,
  perplexity: f32,
  #[builder(default = ENTROPY_TOLERANCE)]
  tolerance: f32,
  #[builder(default = MAX_SEARCH_ITERATIONS)]
  max_iterations: usize,
  #[builder(default = INITIAL_PRECISION)]
  initial_precision: f32,
}

/// Terminal state of one row's search.
struct RowCalibration {
  precision: f32,
  probabilities: Vec<f32>,
}

impl<'a> PerplexitySearch<'a> {
  /*
    Calibrate a Gaussian precision for every row of a squared-distance
    matrix so that each row's conditional neighbor distribution has the
    same perplexity, i.e. the same Shannon entropy ln(perplexity).

    Each row is bisected independently: the search reads its own distances
    plus the shared target entropy and writes only its own precision and
    probabilities, so rows run in parallel with no synchronization. The
    collect at the end is the barrier before symmetrization.

    Parameters
    ----------
    distances: array of shape (n_points, n_points)
        Squared pairwise distances. The diagonal is excluded from each
        row's calibration.

    perplexity: float
        The effective neighbor count every row is tuned to.

    tolerance: float (optional, default 1e-5)
        Convergence threshold on |row entropy - ln(perplexity)|.

    max_iterations: int (optional, default 200)
        Bisection steps allowed per row before the search is abandoned
        with a CalibrationFailed error.

    initial_precision: float (optional, default 1.0)
        Precision every row starts its search from.

    Returns
    -------
    conditional: array of shape (n_points, n_points)
        Row-wise conditional distributions with zero diagonal; every row
        of a non-trivial matrix sums to 1.

    precisions: array of shape (n_points,)
        The converged precision of each row.
  */
  pub fn exec(self) -> Result<(Array2<f32>, Array1<f32>), AffinityError> {
    let PerplexitySearch {
      distances,
      perplexity,
      tolerance,
      max_iterations,
      initial_precision,
    } = self;

    let n_points = distances.shape()[0];
    let target_entropy = perplexity.ln();

    let rows: Vec<RowCalibration> = (0..n_points)
      .into_par_iter()
      .map(|i| {
        // Row i with the self-distance at index i dropped
        let row = distances.row(i);
        let mut neighbors = Vec::with_capacity(n_points.saturating_sub(1));
        for (j, &d) in row.iter().enumerate() {
          if j != i {
            neighbors.push(d);
          }
        }

        calibrate_row(
          &neighbors,
          target_entropy,
          tolerance,
          max_iterations,
          initial_precision,
          i,
        )
      })
      .collect::<Result<Vec<_>, AffinityError>>()?;

    // Re-insert the excluded self-entry as 0 to get full-length rows
    let mut conditional = Array2::<f32>::zeros((n_points, n_points));
    let mut precisions = Array1::<f32>::zeros(n_points);
    for (i, row) in rows.into_iter().enumerate() {
      precisions[i] = row.precision;
      for (offset, &p) in row.probabilities.iter().enumerate() {
        let j = if offset < i { offset } else { offset + 1 };
        conditional[(i, j)] = p;
      }
    }

    Ok((conditional, precisions))
  }
}

/*
  Bisection search for the precision giving one row's conditional
  distribution the target entropy.

  The bracket starts unbounded: while only a lower bound is known the
  precision doubles, while only an upper bound is known it halves, and once
  both bounds exist each step moves to the midpoint. Entropy decreases
  monotonically in the precision, so the bracket always contains the
  solution when one exists.
*/
fn calibrate_row(
  neighbors: &[f32],
  target_entropy: f32,
  tolerance: f32,
  max_iterations: usize,
  initial_precision: f32,
  row: usize,
) -> Result<RowCalibration, AffinityError> {
  // A point with no neighbors has nothing to calibrate; its row stays zero.
  if neighbors.is_empty() {
    return Ok(RowCalibration {
      precision: initial_precision,
      probabilities: Vec::new(),
    });
  }

  let mut precision = initial_precision;
  let mut lower: Option<f32> = None;
  let mut upper: Option<f32> = None;

  let (mut entropy, mut probabilities) = conditional_row(neighbors, precision);
  let mut gap = entropy - target_entropy;

  let mut iterations = 0;
  while f32::abs(gap) > tolerance {
    if iterations >= max_iterations {
      return Err(AffinityError::CalibrationFailed {
        row,
        iterations,
        entropy_gap: f32::abs(gap),
      });
    }

    if gap > 0.0 {
      // Entropy too high: the distribution is too flat, raise the precision
      lower = Some(precision);
      precision = match upper {
        Some(b_max) => (precision + b_max) / 2.0,
        None => precision * 2.0,
      };
    } else {
      // Entropy too low: the distribution is too peaked, lower the precision
      upper = Some(precision);
      precision = match lower {
        Some(b_min) => (precision + b_min) / 2.0,
        None => precision / 2.0,
      };
    }

    (entropy, probabilities) = conditional_row(neighbors, precision);
    gap = entropy - target_entropy;
    iterations += 1;
  }

  Ok(RowCalibration {
    precision,
    probabilities,
  })
}
