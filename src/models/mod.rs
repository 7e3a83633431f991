//! van Genuchten retention model evaluation.

pub mod retention;

pub use retention::*;
