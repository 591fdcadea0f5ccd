//! `baseline-net` library crate.
//!
//! The binary (`baseline-net`) is a thin wrapper around this library so that:
//!
//! - pair selection is testable without spawning processes
//! - the loaders and policies are reusable from other processing chains
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod network;
pub mod plot;
pub mod report;
