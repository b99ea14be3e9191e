//! Numeric utilities: descriptive statistics and classifier metrics.

pub mod metrics;
pub mod stats;

pub use metrics::*;
pub use stats::*;
