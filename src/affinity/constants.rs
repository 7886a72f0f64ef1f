// Constants used throughout the affinity calibration

/// Convergence tolerance on the entropy gap in the bisection search
pub const ENTROPY_TOLERANCE: f32 = 1e-5;

/// Default target perplexity (effective neighbor count)
pub const DEFAULT_PERPLEXITY: f32 = 30.0;

/// Precision every row starts the bisection search from
pub const INITIAL_PRECISION: f32 = 1.0;

/// Iteration cap for a single row's bisection search
pub const MAX_SEARCH_ITERATIONS: usize = 200;
