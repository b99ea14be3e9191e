//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the applicant record (`FinancialRecord`) and its columns (`Feature`)
//! - the labelled sample (`Dataset`)
//! - the run configuration derived from CLI flags (`RunConfig`)

pub mod types;

pub use types::*;
