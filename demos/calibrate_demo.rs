/// Demonstration of perplexity-calibrated affinity computation.
///
/// This example shows how to:
/// 1. Generate synthetic clustered data
/// 2. Calibrate a joint affinity matrix straight from the data
/// 3. Inspect the calibrated invariants
/// 4. Save/load the result for reuse
use affinity_rs::AffinityCalibrator;
use affinity_rs::AffinityConfig;
use affinity_rs::CalibratedAffinities;
use ndarray::Array2;
use rand::Rng;
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
  println!("Affinity Calibration Demo");
  println!();

  // Generate synthetic data: two offset clusters (200 samples, 16 dimensions)
  println!("Generating synthetic data...");
  let n_samples = 200;
  let n_features = 16;

  let mut rng = rand::rng();
  let data: Array2<f32> = Array2::from_shape_fn((n_samples, n_features), |(i, _)| {
    let offset = if i < n_samples / 2 { 0.0 } else { 3.0 };
    offset + rng.random::<f32>()
  });

  // Configure the calibration
  let mut config = AffinityConfig::default();
  config.kernel.perplexity = 20.0;
  let calibrator = AffinityCalibrator::new(config);

  println!();
  println!("=== Calibrating affinities (perplexity 20) ===");
  let calibrated = calibrator.calibrate_from_points(data.view())?;

  let joint = calibrated.joint();
  let total_mass: f32 = joint.iter().sum();
  let precisions = calibrated.precisions();
  let min_precision = precisions.iter().copied().fold(f32::INFINITY, f32::min);
  let max_precision = precisions
    .iter()
    .copied()
    .fold(f32::NEG_INFINITY, f32::max);

  println!("Calibration complete:");
  println!("  - n_points: {}", calibrated.n_points());
  println!("  - total mass: {total_mass:.6}");
  println!("  - precision range: [{min_precision:.4}, {max_precision:.4}]");

  // Save the result (load it later to skip recalibration)
  println!();
  println!("Saving calibrated affinities to disk...");
  let bytes = bincode::serialize(&calibrated)?;
  fs::write("calibrated_affinities.bin", &bytes)?;
  println!("  Saved ({} bytes)", bytes.len());

  let restored: CalibratedAffinities = bincode::deserialize(&fs::read("calibrated_affinities.bin")?)?;
  println!(
    "  Reloaded: {} points, joint shape {:?}",
    restored.n_points(),
    restored.joint().shape()
  );

  fs::remove_file("calibrated_affinities.bin")?;
  println!();
  println!("Done.");

  Ok(())
}
