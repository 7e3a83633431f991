//! `swrc-fit` library crate.
//!
//! Fits the van Genuchten soil-water-retention model to measured
//! (pressure head, water content) pairs, evaluates fit quality, and emits
//! tables and plots.
//!
//! The binary (`swrc`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future batch tooling, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
