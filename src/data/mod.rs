//! Synthetic SME sample generation and train/test splitting.

pub mod split;
pub mod synthetic;

pub use split::*;
pub use synthetic::*;
