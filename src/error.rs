use thiserror::Error;

/// Validation and convergence failures of affinity calibration.
///
/// Input validation errors are raised before any row processing begins;
/// `CalibrationFailed` is raised from inside the per-row search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AffinityError {
  /// The distance matrix is not square.
  #[error("distance matrix must be square, got {rows}x{cols}")]
  NonSquareInput { rows: usize, cols: usize },

  /// The distance matrix contains a negative entry.
  #[error("distance matrix entry ({row}, {col}) is negative: {value}")]
  NegativeDistance { row: usize, col: usize, value: f32 },

  /// The target perplexity is not positive.
  #[error("perplexity must be positive, got {0}")]
  InvalidPerplexity(f32),

  /// The entropy convergence tolerance is not positive.
  #[error("tolerance must be positive, got {0}")]
  InvalidTolerance(f32),

  /// The starting precision is not positive.
  #[error("initial precision must be positive, got {0}")]
  InvalidInitialPrecision(f32),

  /// The bisection iteration cap is zero.
  #[error("max_iterations must be at least 1")]
  InvalidIterationCap,

  /// A row's bisection search ran out of iterations before reaching the
  /// target entropy. Happens when the target perplexity is unreachable
  /// from the data, e.g. a perplexity of at least the number of points.
  #[error(
    "row {row} did not reach the target entropy after {iterations} iterations \
     (remaining entropy gap: {entropy_gap})"
  )]
  CalibrationFailed {
    row: usize,
    iterations: usize,
    entropy_gap: f32,
  },
}
