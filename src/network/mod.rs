//! Interferogram pair-network construction.
//!
//! Responsibilities:
//!
//! - generate topological candidates per selection policy
//! - enforce the baseline thresholds on every candidate
//! - order, deduplicate and merge the per-policy sets

pub mod long;
pub mod selector;

pub use long::*;
pub use selector::*;
