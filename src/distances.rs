use crate::metric::Metric;
use ndarray::ArrayView1;

/// Squared Euclidean (L2) distance metric.
///
/// Computes sum((x_i - y_i)^2) without the square root; the Gaussian kernel
/// consumes squared distances, so the root would be wasted work anyway.
#[derive(Debug, Clone, Copy)]
pub struct SquaredEuclidean;

impl Metric for SquaredEuclidean {
  fn squared_distance(&self, x: ArrayView1<f32>, y: ArrayView1<f32>) -> f32 {
    rdist(&x, &y)
  }
}

/// Squared Euclidean distance (rdist).
/// OPTIMIZATION: Inline always and use iterator for better auto-vectorization
#[inline(always)]
pub fn rdist(x: &ArrayView1<f32>, y: &ArrayView1<f32>) -> f32 {
  // Using iterator allows better SIMD auto-vectorization
  x.iter()
    .zip(y.iter())
    .map(|(a, b)| {
      let diff = a - b;
      diff * diff
    })
    .sum()
}
