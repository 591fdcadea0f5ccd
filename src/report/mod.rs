//! Reporting utilities: terminal run summary.

pub mod format;

pub use format::*;
