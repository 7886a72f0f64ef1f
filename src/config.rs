use crate::affinity::constants::DEFAULT_PERPLEXITY;
use crate::affinity::constants::ENTROPY_TOLERANCE;
use crate::affinity::constants::INITIAL_PRECISION;
use crate::affinity::constants::MAX_SEARCH_ITERATIONS;
use serde::Deserialize;
use serde::Serialize;

/// Configuration for the per-point Gaussian kernels.
///
/// These parameters control the shape of the conditional neighbor
/// distribution each point spreads over its neighbors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelParams {
  /// Target perplexity: the effective number of neighbors each point's
  /// conditional distribution spreads over.
  ///
  /// Every row's precision is tuned until the row entropy equals
  /// ln(perplexity). Larger values spread probability mass over more
  /// neighbors, smaller values concentrate it on the closest ones.
  /// Typical range is 5-50, and it must be smaller than the number of
  /// neighbors a point has (n - 1) to be reachable.
  ///
  /// Must be positive.
  ///
  /// Default: 30.0
  pub perplexity: f32,

  /// Precision (inverse variance) every row starts its search from.
  ///
  /// The search brackets outward from this value, so any positive starting
  /// point converges to the same precision; changing it only shifts the
  /// number of iterations needed.
  ///
  /// Must be positive.
  ///
  /// Default: 1.0
  pub initial_precision: f32,
}

impl Default for KernelParams {
  fn default() -> Self {
    Self {
      perplexity: DEFAULT_PERPLEXITY,
      initial_precision: INITIAL_PRECISION,
    }
  }
}

/// Configuration for the entropy bisection search.
///
/// These parameters control when a row's search is considered converged
/// and when it is abandoned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
  /// Convergence threshold on |row entropy - ln(perplexity)|.
  ///
  /// Smaller values calibrate the perplexity more precisely at the cost of
  /// extra bisection steps per row.
  ///
  /// Must be positive.
  ///
  /// Default: 1e-5
  pub tolerance: f32,

  /// Iteration cap for a single row's bisection search.
  ///
  /// A target entropy the data cannot reach (for example a perplexity of
  /// at least the number of points) would otherwise search forever;
  /// exceeding the cap reports `AffinityError::CalibrationFailed` for the
  /// offending row.
  ///
  /// Must be >= 1.
  ///
  /// Default: 200
  pub max_iterations: usize,
}

impl Default for SearchParams {
  fn default() -> Self {
    Self {
      tolerance: ENTROPY_TOLERANCE,
      max_iterations: MAX_SEARCH_ITERATIONS,
    }
  }
}

/// Complete affinity calibration configuration.
///
/// Groups all parameters for affinity computation into a coherent structure.
/// Both parameter groups have sensible defaults and can be customized
/// individually.
///
/// # Example
///
/// ```ignore
/// use affinity_rs::config::{AffinityConfig, KernelParams};
///
/// // Use all defaults
/// let config = AffinityConfig::default();
///
/// // Customize specific groups
/// let config = AffinityConfig {
///     kernel: KernelParams {
///         perplexity: 15.0,
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AffinityConfig {
  /// Gaussian kernel configuration.
  pub kernel: KernelParams,

  /// Bisection search configuration.
  pub search: SearchParams,
}
