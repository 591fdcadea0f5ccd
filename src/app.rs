//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the selection pipeline (load, select, write lists and plot)
//! - prints the run summary
//! - writes parameter templates for `init`

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::{Command, InitArgs, SelectArgs};
use crate::domain::RunConfig;
use crate::error::{AppError, EXIT_INPUT};

pub mod pipeline;

/// Entry point for the `baseline-net` binary.
pub fn run() -> Result<(), AppError> {
    // `baseline-net PRM TABLE` behaves like `baseline-net select PRM TABLE`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Select(args) => handle_select(args),
        Command::Init(args) => handle_init(args),
    }
}

fn handle_select(args: SelectArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_selection(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.inputs.catalog, &run.inputs.config, &run.network, run.inputs.excluded)
    );
    for path in &run.written {
        log::info!("Wrote {}", path.display());
    }
    Ok(())
}

fn handle_init(args: InitArgs) -> Result<(), AppError> {
    for (name, value) in [("DT_MIN", args.dt_min), ("DT_MAX", args.dt_max), ("BP_MAX", args.bp_max)] {
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::new(EXIT_INPUT, format!("{name} must be a non-negative number, got {value}")));
        }
    }
    if args.dt_min > args.dt_max {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("DT_MIN ({}) exceeds DT_MAX ({})", args.dt_min, args.dt_max),
        ));
    }

    let path = crate::io::prm::write_template(&args.out_dir, &args.name, args.dt_min, args.dt_max, args.bp_max)?;
    println!("Wrote parameter template {}", path.display());
    Ok(())
}

pub fn run_config_from_args(args: &SelectArgs) -> RunConfig {
    let out_dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| default_out_dir(&args.prm_file));

    RunConfig {
        prm_path: args.prm_file.clone(),
        baseline_path: args.baseline_table.clone(),
        out_dir,
        plot: !args.no_plot,
        export_json: args.export_json.clone(),
    }
}

/// Outputs land next to the parameter file unless `--out-dir` says otherwise.
fn default_out_dir(prm_file: &Path) -> PathBuf {
    match prm_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Rewrite argv so bare positional arguments default to `select`.
///
/// Rules:
/// - `baseline-net PRM TABLE`          -> `baseline-net select PRM TABLE`
/// - `baseline-net --out-dir D ...`    -> `baseline-net select --out-dir D ...`
/// - `baseline-net --help/--version`   -> unchanged (show top-level help/version)
/// - `baseline-net`                    -> unchanged (clap prints usage)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "select" | "init");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "select".to_string());
    argv
}
