//! Input/output helpers.
//!
//! - parameter file parsing + template (`prm`)
//! - baseline table parsing (`baseline`)
//! - catalogue assembly and validation (`catalog`)
//! - pair-list and JSON exports (`export`)

pub mod baseline;
pub mod catalog;
pub mod export;
pub mod prm;

pub use baseline::*;
pub use catalog::*;
pub use export::*;
pub use prm::*;
