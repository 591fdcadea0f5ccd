//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the acquisition catalogue (`Acquisition`, `Catalog`)
//! - selection configuration (`SelectionPolicy`, `Thresholds`, `ReferenceSpec`, `SelectionConfig`)
//! - selection outputs (`Pair`, `PolicyPairs`, `PairNetwork`)

pub mod types;

pub use types::*;
