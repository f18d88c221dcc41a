// src/types.rs
// Type aliases to reduce complexity warnings

use std::error::Error;

/// (x, y) points of one curve.
pub type TimeSeries = Vec<(f64, f64)>;

/// Result of a chart rendering function.
pub type PlotResult = Result<(), Box<dyn Error>>;

// src/types.rs
