//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the measured observation series (`RetentionSeries`)
//! - the van Genuchten parameter vector and its box bounds
//! - fit outputs (`VgFit`, `FitQuality`)
//! - run configuration (`FitConfig`) and the portable curve file schema

pub mod types;

pub use types::*;
