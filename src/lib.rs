//! `sme-credit` library crate.
//!
//! The binary (`sme`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the interactive scorer can be driven by scripted input

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod logging;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod scoring;
