//! Plot rendering.
//!
//! - deterministic ASCII plots for the terminal (`ascii`)
//! - SVG figures via Plotters (`svg`)

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;
