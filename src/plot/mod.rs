//! Baseline diagram: geometry (`diagram`) and SVG rendering (`svg`).

pub mod diagram;
pub mod svg;

pub use diagram::*;
pub use svg::*;
