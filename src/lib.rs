//! Fast, parallel Rust implementation of perplexity-calibrated Gaussian
//! affinities.
//!
//! This library computes the symmetric affinity matrix used as the input of
//! embedding optimizers in the t-SNE family. Given a dense matrix of squared
//! pairwise distances, it tunes a Gaussian precision for every point by
//! bisection so that each point's conditional neighbor distribution has a
//! chosen perplexity, then symmetrizes the conditional distributions into a
//! single joint affinity matrix.
//!
//! # Example
//!
//! ```ignore
//! use affinity_rs::{AffinityCalibrator, AffinityConfig};
//!
//! // Configure the calibration
//! let mut config = AffinityConfig::default();
//! config.kernel.perplexity = 30.0;
//! let calibrator = AffinityCalibrator::new(config);
//!
//! // Calibrate from precomputed squared distances...
//! let calibrated = calibrator.calibrate(distances.view())?;
//!
//! // ...or straight from a data matrix
//! let calibrated = calibrator.calibrate_from_points(data.view())?;
//!
//! // Get the joint affinity matrix
//! let joint = calibrated.joint();
//! ```
//!
//! # Features
//!
//! - **Parallel calibration**: every row's bisection search runs on Rayon
//! - **Extensible metrics**: custom distance functions via the `Metric` trait
//! - **Zero-copy views**: efficient array handling with `ndarray`
//! - **Bounded search**: an iteration cap turns an unreachable perplexity
//!   into a reported error instead of an endless loop
//!
//! # Limitations
//!
//! - Dense matrices only (no sparse neighbor lists)
//! - The downstream embedding optimization is out of scope; this crate stops
//!   at the joint affinity matrix
//!
//! # Public API
//!
//! The library exposes a minimal, well-defined API:
//!
//! * [`AffinityCalibrator`] - Main algorithm struct
//! * [`CalibratedAffinities`] - Calibration result with the joint matrix
//! * [`AffinityConfig`] - Configuration parameters
//! * [`AffinityError`] - Validation and convergence failures
//! * [`Metric`] - Distance metric trait
//! * [`SquaredEuclidean`] - Squared Euclidean distance implementation

// Public modules
pub mod config;
pub mod error;
pub mod metric;

// Public re-exports (primary API)
pub use calibrator::AffinityCalibrator;
pub use calibrator::CalibratedAffinities;
pub use config::AffinityConfig;
pub use config::KernelParams;
pub use config::SearchParams;
pub use error::AffinityError;
pub use metric::Metric;

// Internal modules (not exposed)
mod affinity;
mod calibrator;
mod distances;

// Re-exports for advanced users who want the individual pipeline stages
pub use affinity::pairwise::PairwiseDistances;
pub use affinity::perplexity_search::PerplexitySearch;
pub use distances::SquaredEuclidean;

// Tests
#[cfg(test)]
mod tests;
