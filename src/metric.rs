use ndarray::ArrayView1;
use std::fmt::Debug;

/// A distance metric for affinity computation.
///
/// The Gaussian kernel operates on squared distances directly, so only the
/// squared distance is required; implementations never need a square root.
/// Thread-safety (Send + Sync) is required because pairwise distances are
/// computed row-parallel.
pub trait Metric: Debug + Send + Sync {
  /// Compute the squared distance between two points.
  ///
  /// # Arguments
  ///
  /// * `a` - First point
  /// * `b` - Second point
  ///
  /// # Returns
  ///
  /// The squared distance as a non-negative scalar. Returning a negative
  /// value makes downstream calibration reject the distance matrix.
  fn squared_distance(&self, a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32;
}
