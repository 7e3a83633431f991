//! Numerical primitives shared by the fitter and the fit-quality analyzer.

pub mod ols;

pub use ols::*;
