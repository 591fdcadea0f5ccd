//! Command-line parsing for the baseline-network builder.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the loading/selection code. Selection behaviour itself lives in
//! the parameter file, not in flags.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "baseline-net",
    version,
    about = "SAR interferogram pair selection from a baseline table"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Select interferogram pairs, write pair lists and the baseline plot.
    ///
    /// This is the default: `baseline-net PRM TABLE` runs `select`.
    Select(SelectArgs),
    /// Write a commented parameter file template.
    Init(InitArgs),
}

/// Options for pair selection.
#[derive(Debug, Parser, Clone)]
pub struct SelectArgs {
    /// Parameter file with selection flags (SEQUENTIAL, SKIP, Y2Y_INTFS, ...).
    #[arg(value_name = "PRM_FILE")]
    pub prm_file: PathBuf,

    /// Baseline table (GMTSAR baseline_table.dat or `date temporal spatial`).
    #[arg(value_name = "BASELINE_TABLE")]
    pub baseline_table: PathBuf,

    /// Directory for all outputs (default: the parameter file's directory).
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Skip rendering baseline_plot.svg.
    #[arg(long)]
    pub no_plot: bool,

    /// Also export the selected network (acquisitions + pairs per policy) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for writing a parameter template.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Minimum interferogram epoch length (days).
    pub dt_min: f64,

    /// Maximum interferogram epoch length (days).
    pub dt_max: f64,

    /// Maximum perpendicular baseline (m).
    pub bp_max: f64,

    /// Template name; writes `<NAME>.PRM`.
    pub name: String,

    /// Directory to write the template into.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,
}
