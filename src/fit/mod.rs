//! Parameter estimation and goodness-of-fit evaluation.

pub mod fitter;
pub mod quality;

pub use fitter::*;
pub use quality::*;
