#[cfg(test)]
mod tests {
  use crate::AffinityCalibrator;
  use crate::AffinityConfig;
  use crate::AffinityError;
  use crate::CalibratedAffinities;
  use crate::PairwiseDistances;
  use crate::PerplexitySearch;
  use crate::SquaredEuclidean;
  use ndarray::Array2;
  use ndarray::ArrayView1;
  use rand::Rng;

  /// Generate a squared-distance matrix from random points
  fn generate_distance_matrix(n_points: usize) -> Array2<f32> {
    let n_features = 5;

    let mut rng = rand::rng();
    let data: Array2<f32> = Array2::from_shape_fn((n_points, n_features), |_| rng.random());

    let mut distances = Array2::<f32>::zeros((n_points, n_points));
    for i in 0..n_points {
      for j in 0..n_points {
        if i != j {
          let diff_sq: f32 = data
            .row(i)
            .iter()
            .zip(data.row(j).iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
          distances[(i, j)] = diff_sq;
        }
      }
    }

    distances
  }

  fn config_with_perplexity(perplexity: f32) -> AffinityConfig {
    let mut config = AffinityConfig::default();
    config.kernel.perplexity = perplexity;
    config
  }

  /// Shannon entropy of one conditional row, zero entries skipped
  fn row_entropy(row: ArrayView1<f32>) -> f32 {
    let mut entropy = 0.0;
    for &p in row.iter() {
      if p > 0.0 {
        entropy -= p * f32::ln(p);
      }
    }
    entropy
  }

  #[test]
  fn test_joint_matrix_invariants() {
    let distances = generate_distance_matrix(30);

    let calibrator = AffinityCalibrator::new(config_with_perplexity(5.0));
    let calibrated = calibrator.calibrate(distances.view()).unwrap();
    let joint = calibrated.joint();

    assert_eq!(joint.shape(), &[30, 30]);
    assert_eq!(calibrated.n_points(), 30);

    for i in 0..30 {
      assert_eq!(joint[(i, i)], 0.0);
      for j in 0..30 {
        assert!(joint[(i, j)] >= 0.0);
        assert_eq!(joint[(i, j)], joint[(j, i)]);
      }
    }

    let total_mass: f32 = joint.iter().sum();
    assert!(
      (total_mass - 1.0).abs() < 1e-3,
      "total mass {total_mass} should be ~1"
    );
  }

  #[test]
  fn test_conditional_rows_sum_to_one() {
    let distances = generate_distance_matrix(25);

    let (conditional, precisions) = PerplexitySearch::builder()
      .distances(distances.view())
      .perplexity(8.0)
      .build()
      .exec()
      .unwrap();

    for i in 0..25 {
      let row_sum: f32 = conditional.row(i).iter().sum();
      assert!(
        (row_sum - 1.0).abs() < 1e-4,
        "row {i} sums to {row_sum}, expected ~1"
      );
      assert_eq!(conditional[(i, i)], 0.0);
      assert!(precisions[i] > 0.0);
    }
  }

  #[test]
  fn test_entropy_converges_to_target() {
    let distances = generate_distance_matrix(25);
    let perplexity = 8.0f32;

    let (conditional, _) = PerplexitySearch::builder()
      .distances(distances.view())
      .perplexity(perplexity)
      .build()
      .exec()
      .unwrap();

    let target = perplexity.ln();
    for i in 0..25 {
      let entropy = row_entropy(conditional.row(i));
      assert!(
        (entropy - target).abs() <= 2e-5,
        "row {i} entropy {entropy} is not within tolerance of target {target}"
      );
    }
  }

  #[test]
  fn test_higher_perplexity_gives_lower_precision() {
    let distances = generate_distance_matrix(30);

    let narrow = AffinityCalibrator::new(config_with_perplexity(5.0))
      .calibrate(distances.view())
      .unwrap();
    let wide = AffinityCalibrator::new(config_with_perplexity(15.0))
      .calibrate(distances.view())
      .unwrap();

    for i in 0..30 {
      assert!(
        wide.precisions()[i] < narrow.precisions()[i],
        "row {i}: precision at perplexity 15 should be below precision at perplexity 5"
      );
    }
  }

  #[test]
  fn test_empty_input() {
    let distances = Array2::<f32>::zeros((0, 0));

    let calibrator = AffinityCalibrator::new(AffinityConfig::default());
    let calibrated = calibrator.calibrate(distances.view()).unwrap();

    assert_eq!(calibrated.joint().shape(), &[0, 0]);
    assert_eq!(calibrated.precisions().len(), 0);
    assert_eq!(calibrated.n_points(), 0);
  }

  #[test]
  fn test_single_point() {
    let distances = Array2::<f32>::zeros((1, 1));

    let calibrator = AffinityCalibrator::new(AffinityConfig::default());
    let calibrated = calibrator.calibrate(distances.view()).unwrap();

    assert_eq!(calibrated.joint().shape(), &[1, 1]);
    assert_eq!(calibrated.joint()[(0, 0)], 0.0);
  }

  #[test]
  fn test_three_point_scenario() {
    let distances =
      Array2::from_shape_vec((3, 3), vec![0.0, 1.0, 4.0, 1.0, 0.0, 1.0, 4.0, 1.0, 0.0]).unwrap();

    let calibrator = AffinityCalibrator::new(config_with_perplexity(2.0));
    let calibrated = calibrator.calibrate(distances.view()).unwrap();
    let joint = calibrated.joint();

    for i in 0..3 {
      assert_eq!(joint[(i, i)], 0.0);
      for j in 0..3 {
        assert_eq!(joint[(i, j)], joint[(j, i)]);
      }
    }

    let total_mass: f32 = joint.iter().sum();
    assert!((total_mass - 1.0).abs() < 1e-4);

    // The middle point is equidistant from both others, so its conditional
    // distribution is uniform at any precision
    let (conditional, _) = PerplexitySearch::builder()
      .distances(distances.view())
      .perplexity(2.0)
      .build()
      .exec()
      .unwrap();
    assert_eq!(conditional[(1, 0)], 0.5);
    assert_eq!(conditional[(1, 1)], 0.0);
    assert_eq!(conditional[(1, 2)], 0.5);

    let target = 2.0f32.ln();
    for i in 0..3 {
      let entropy = row_entropy(conditional.row(i));
      assert!(
        (entropy - target).abs() <= 2e-5,
        "row {i} entropy {entropy} should be ~ln(2)"
      );
    }
  }

  #[test]
  fn test_unreachable_perplexity_fails() {
    // 5 points have 4 neighbors each: the maximum row entropy is ln(4),
    // below the ln(5) target
    let distances = generate_distance_matrix(5);

    let calibrator = AffinityCalibrator::new(config_with_perplexity(5.0));
    let result = calibrator.calibrate(distances.view());

    match result {
      Err(AffinityError::CalibrationFailed { iterations, .. }) => {
        assert_eq!(iterations, AffinityConfig::default().search.max_iterations);
      }
      other => panic!("expected CalibrationFailed, got {other:?}"),
    }
  }

  #[test]
  fn test_deterministic_output() {
    let distances = generate_distance_matrix(20);
    let calibrator = AffinityCalibrator::new(config_with_perplexity(6.0));

    let first = calibrator.calibrate(distances.view()).unwrap();
    let second = calibrator.calibrate(distances.view()).unwrap();

    for (a, b) in first.joint().iter().zip(second.joint().iter()) {
      assert_eq!(a, b);
    }
    for (a, b) in first.precisions().iter().zip(second.precisions().iter()) {
      assert_eq!(a, b);
    }
  }

  #[test]
  fn test_rejects_non_square_input() {
    let distances = Array2::<f32>::zeros((2, 3));

    let calibrator = AffinityCalibrator::new(AffinityConfig::default());
    let result = calibrator.calibrate(distances.view());

    assert_eq!(
      result.unwrap_err(),
      AffinityError::NonSquareInput { rows: 2, cols: 3 }
    );
  }

  #[test]
  fn test_rejects_negative_distance() {
    let mut distances = generate_distance_matrix(4);
    distances[(2, 1)] = -0.5;

    let calibrator = AffinityCalibrator::new(AffinityConfig::default());
    let result = calibrator.calibrate(distances.view());

    assert_eq!(
      result.unwrap_err(),
      AffinityError::NegativeDistance {
        row: 2,
        col: 1,
        value: -0.5
      }
    );
  }

  #[test]
  fn test_rejects_invalid_parameters() {
    let distances = generate_distance_matrix(4);

    let calibrator = AffinityCalibrator::new(config_with_perplexity(0.0));
    assert_eq!(
      calibrator.calibrate(distances.view()).unwrap_err(),
      AffinityError::InvalidPerplexity(0.0)
    );

    let mut config = AffinityConfig::default();
    config.search.tolerance = -1e-5;
    let calibrator = AffinityCalibrator::new(config);
    assert_eq!(
      calibrator.calibrate(distances.view()).unwrap_err(),
      AffinityError::InvalidTolerance(-1e-5)
    );

    let mut config = AffinityConfig::default();
    config.search.max_iterations = 0;
    let calibrator = AffinityCalibrator::new(config);
    assert_eq!(
      calibrator.calibrate(distances.view()).unwrap_err(),
      AffinityError::InvalidIterationCap
    );

    let mut config = AffinityConfig::default();
    config.kernel.initial_precision = 0.0;
    let calibrator = AffinityCalibrator::new(config);
    assert_eq!(
      calibrator.calibrate(distances.view()).unwrap_err(),
      AffinityError::InvalidInitialPrecision(0.0)
    );
  }

  #[test]
  fn test_calibrate_from_points() {
    let mut rng = rand::rng();
    let data: Array2<f32> = Array2::from_shape_fn((20, 4), |_| rng.random());

    let calibrator = AffinityCalibrator::new(config_with_perplexity(5.0));
    let calibrated = calibrator.calibrate_from_points(data.view()).unwrap();
    let joint = calibrated.joint();

    assert_eq!(joint.shape(), &[20, 20]);
    for i in 0..20 {
      assert_eq!(joint[(i, i)], 0.0);
      for j in 0..20 {
        assert_eq!(joint[(i, j)], joint[(j, i)]);
      }
    }

    let total_mass: f32 = joint.iter().sum();
    assert!((total_mass - 1.0).abs() < 1e-3);
  }

  #[test]
  fn test_pairwise_distances() {
    let mut rng = rand::rng();
    let data: Array2<f32> = Array2::from_shape_fn((10, 3), |_| rng.random());

    let metric = SquaredEuclidean;
    let distances = PairwiseDistances::builder()
      .data(data.view())
      .metric(&metric)
      .build()
      .exec();

    assert_eq!(distances.shape(), &[10, 10]);
    for i in 0..10 {
      assert_eq!(distances[(i, i)], 0.0);
      for j in 0..10 {
        assert!(distances[(i, j)] >= 0.0);
        assert_eq!(distances[(i, j)], distances[(j, i)]);
      }
    }
  }

  #[test]
  fn test_calibrated_serialization() {
    let distances = generate_distance_matrix(15);

    let calibrator = AffinityCalibrator::new(config_with_perplexity(5.0));
    let calibrated = calibrator.calibrate(distances.view()).unwrap();

    let serialized = bincode::serialize(&calibrated).expect("Serialization failed");
    let restored: CalibratedAffinities =
      bincode::deserialize(&serialized).expect("Deserialization failed");

    assert_eq!(restored.n_points(), calibrated.n_points());
    assert_eq!(restored.joint().shape(), calibrated.joint().shape());
    for (a, b) in calibrated.joint().iter().zip(restored.joint().iter()) {
      assert_eq!(a, b);
    }
    for (a, b) in calibrated
      .precisions()
      .iter()
      .zip(restored.precisions().iter())
    {
      assert_eq!(a, b);
    }
  }
}
