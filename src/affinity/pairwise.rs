use crate::metric::Metric;
use ndarray::Array2;
use ndarray::ArrayView2;
use rayon::prelude::*;
use typed_builder::TypedBuilder;

/*
  Dense squared pairwise distances of a data matrix under a metric.

  Parameters
  ----------
  data: array of shape (n_points, n_features)
      The points to measure pairwise.

  metric: Metric
      The metric supplying squared distances.

  Returns
  -------
  distances: array of shape (n_points, n_points)
      distances[i][j] is the squared distance between point i and point j,
      with a zero diagonal by construction.
*/
#[derive(TypedBuilder, Debug)]
pub struct PairwiseDistances<'a, 'm> {
  data: ArrayView2<'a, f32>,
  metric: &'m dyn Metric,
}

impl<'a, 'm> PairwiseDistances<'a, 'm> {
  pub fn exec(self) -> Array2<f32> {
    let PairwiseDistances { data, metric } = self;

    let n_points = data.shape()[0];

    // Each output row depends only on its own point, so rows are computed
    // in parallel and stitched together afterwards.
    let rows: Vec<Vec<f32>> = (0..n_points)
      .into_par_iter()
      .map(|i| {
        let a = data.row(i);
        (0..n_points)
          .map(|j| {
            if i == j {
              0.0
            } else {
              metric.squared_distance(a, data.row(j))
            }
          })
          .collect()
      })
      .collect();

    let mut distances = Array2::<f32>::zeros((n_points, n_points));
    for (i, row) in rows.into_iter().enumerate() {
      for (j, d) in row.into_iter().enumerate() {
        distances[(i, j)] = d;
      }
    }

    distances
  }
}
