use crate::affinity::pairwise::PairwiseDistances;
use crate::affinity::perplexity_search::PerplexitySearch;
use crate::affinity::symmetrize::symmetrize;
use crate::config::AffinityConfig;
use crate::distances::SquaredEuclidean;
use crate::error::AffinityError;
use crate::metric::Metric;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use serde::Deserialize;
use serde::Serialize;
use std::time::Instant;
use tracing::info;

/// Perplexity-calibrated Gaussian affinity computation.
///
/// This struct holds the configuration and metric for affinity calibration.
/// It can be reused to calibrate multiple distance matrices with the same
/// parameters.
///
/// # Example
///
/// ```ignore
/// use affinity_rs::{AffinityCalibrator, AffinityConfig};
///
/// let mut config = AffinityConfig::default();
/// config.kernel.perplexity = 20.0;
/// let calibrator = AffinityCalibrator::new(config);
///
/// let calibrated = calibrator.calibrate(distances.view())?;
/// let joint = calibrated.joint();
/// ```
pub struct AffinityCalibrator {
  config: AffinityConfig,
  metric: Box<dyn Metric>,
}

impl AffinityCalibrator {
  /// Create a new calibrator with the default squared Euclidean metric.
  ///
  /// The metric only matters for [`calibrate_from_points`]; calibrating a
  /// precomputed distance matrix never touches it.
  ///
  /// # Arguments
  ///
  /// * `config` - Affinity calibration parameters
  ///
  /// [`calibrate_from_points`]: AffinityCalibrator::calibrate_from_points
  pub fn new(config: AffinityConfig) -> Self {
    Self {
      config,
      metric: Box::new(SquaredEuclidean),
    }
  }

  /// Create a calibrator with a custom distance metric.
  ///
  /// # Arguments
  ///
  /// * `config` - Affinity calibration parameters
  /// * `metric` - Metric supplying squared distances between points
  ///
  /// # Example
  ///
  /// ```ignore
  /// let calibrator = AffinityCalibrator::with_metric(
  ///     config,
  ///     Box::new(MyCustomMetric),
  /// );
  /// ```
  pub fn with_metric(config: AffinityConfig, metric: Box<dyn Metric>) -> Self {
    Self { config, metric }
  }

  /// Calibrate a joint affinity matrix from squared pairwise distances.
  ///
  /// For every row a Gaussian precision is found by bisection such that the
  /// row's conditional neighbor distribution has entropy ln(perplexity);
  /// the converged conditional rows are then symmetrized into the joint
  /// matrix (P^T + P) / (2n).
  ///
  /// # Arguments
  ///
  /// * `distances` - Squared pairwise distances (n_points × n_points).
  ///   The diagonal is ignored; all entries must be non-negative.
  ///
  /// # Returns
  ///
  /// A `CalibratedAffinities` holding the joint matrix and the per-row
  /// precisions. An empty input yields an empty result without any
  /// calibration.
  ///
  /// # Errors
  ///
  /// * Validation errors (`NonSquareInput`, `NegativeDistance`,
  ///   `InvalidPerplexity`, `InvalidTolerance`, `InvalidInitialPrecision`,
  ///   `InvalidIterationCap`) before any row processing begins
  /// * `CalibrationFailed` when a row's search exhausts its iteration cap,
  ///   e.g. because the target perplexity is unreachable from the data
  pub fn calibrate(
    &self,
    distances: ArrayView2<f32>,
  ) -> Result<CalibratedAffinities, AffinityError> {
    self.validate_parameters()?;
    validate_distances(&distances)?;

    let n_points = distances.shape()[0];
    if n_points == 0 {
      return Ok(CalibratedAffinities {
        joint: Array2::zeros((0, 0)),
        precisions: Array1::zeros(0),
        n_points: 0,
        config: self.config.clone(),
      });
    }

    info!(
      n_points,
      perplexity = self.config.kernel.perplexity,
      "starting perplexity search"
    );
    let started = Instant::now();
    let (conditional, precisions) = PerplexitySearch::builder()
      .distances(distances)
      .perplexity(self.config.kernel.perplexity)
      .tolerance(self.config.search.tolerance)
      .max_iterations(self.config.search.max_iterations)
      .initial_precision(self.config.kernel.initial_precision)
      .build()
      .exec()?;
    info!(
      duration_ms = started.elapsed().as_millis(),
      "perplexity search complete"
    );

    let started = Instant::now();
    let joint = symmetrize(&conditional);
    info!(
      duration_ms = started.elapsed().as_millis(),
      "symmetrization complete"
    );

    Ok(CalibratedAffinities {
      joint,
      precisions,
      n_points,
      config: self.config.clone(),
    })
  }

  /// Calibrate a joint affinity matrix straight from a data matrix.
  ///
  /// Computes dense squared pairwise distances under the configured metric
  /// and feeds them through [`calibrate`].
  ///
  /// # Arguments
  ///
  /// * `data` - Input data matrix (n_points × n_features)
  ///
  /// # Errors
  ///
  /// Same failure modes as [`calibrate`].
  ///
  /// [`calibrate`]: AffinityCalibrator::calibrate
  pub fn calibrate_from_points(
    &self,
    data: ArrayView2<f32>,
  ) -> Result<CalibratedAffinities, AffinityError> {
    self.validate_parameters()?;

    let started = Instant::now();
    let distances = PairwiseDistances::builder()
      .data(data)
      .metric(self.metric.as_ref())
      .build()
      .exec();
    info!(
      duration_ms = started.elapsed().as_millis(),
      n_points = data.shape()[0],
      "pairwise distances complete"
    );

    self.calibrate(distances.view())
  }

  fn validate_parameters(&self) -> Result<(), AffinityError> {
    let kernel = &self.config.kernel;
    let search = &self.config.search;

    if !(kernel.perplexity > 0.0) {
      return Err(AffinityError::InvalidPerplexity(kernel.perplexity));
    }

    if !(search.tolerance > 0.0) {
      return Err(AffinityError::InvalidTolerance(search.tolerance));
    }

    if !(kernel.initial_precision > 0.0) {
      return Err(AffinityError::InvalidInitialPrecision(
        kernel.initial_precision,
      ));
    }

    if search.max_iterations == 0 {
      return Err(AffinityError::InvalidIterationCap);
    }

    Ok(())
  }
}

fn validate_distances(distances: &ArrayView2<f32>) -> Result<(), AffinityError> {
  let (rows, cols) = distances.dim();
  if rows != cols {
    return Err(AffinityError::NonSquareInput { rows, cols });
  }

  for ((row, col), &value) in distances.indexed_iter() {
    if value < 0.0 {
      return Err(AffinityError::NegativeDistance { row, col, value });
    }
  }

  Ok(())
}

/// Calibrated joint affinities and the local kernel geometry behind them.
///
/// This is the final output of calibration, ready to hand to an embedding
/// optimizer. It can be serialized to skip recalibration on identical
/// input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibratedAffinities {
  /// Joint affinity matrix (P^T + P) / (2n): symmetric, non-negative,
  /// zero diagonal, total mass 1.
  pub(crate) joint: Array2<f32>,

  /// Converged Gaussian precision (inverse variance) per point.
  pub(crate) precisions: Array1<f32>,

  /// Number of points the matrix was calibrated over.
  pub(crate) n_points: usize,

  /// The configuration this result was produced with.
  pub(crate) config: AffinityConfig,
}

impl CalibratedAffinities {
  /// Get a view of the joint affinity matrix.
  ///
  /// Returns a zero-copy view of shape (n_points, n_points).
  pub fn joint(&self) -> ArrayView2<'_, f32> {
    self.joint.view()
  }

  /// Consume the result and return the joint matrix, avoiding a copy.
  pub fn into_joint(self) -> Array2<f32> {
    self.joint
  }

  /// Get a view of the converged per-point precisions.
  pub fn precisions(&self) -> ArrayView1<'_, f32> {
    self.precisions.view()
  }

  /// Get the number of points the matrix was calibrated over.
  pub fn n_points(&self) -> usize {
    self.n_points
  }

  /// Get a reference to the configuration used for this calibration.
  pub fn config(&self) -> &AffinityConfig {
    &self.config
  }
}
