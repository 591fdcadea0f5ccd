//! The selection pipeline: load -> select -> emit.
//!
//! Loading validates everything (both input files, reference, duplicates)
//! before the first output file is opened, so a fatal input error never
//! leaves a half-written set of pair lists behind.

use std::path::PathBuf;

use crate::domain::{PairNetwork, RunConfig};
use crate::error::AppError;
use crate::io::{LoadedInputs, load_inputs, write_network_json, write_pair_lists};
use crate::network::select_pairs;
use crate::plot::{PLOT_FILE, build_diagram, render_svg};

/// Baseline plot size in pixels.
const PLOT_SIZE: (u32, u32) = (1000, 600);

/// All computed outputs of a single selection run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub inputs: LoadedInputs,
    pub network: PairNetwork,
    /// Every file written, in write order.
    pub written: Vec<PathBuf>,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_selection(config: &RunConfig) -> Result<RunOutput, AppError> {
    // 1) Load and validate both inputs.
    let inputs = load_inputs(&config.prm_path, &config.baseline_path)?;

    // 2) Select pairs per policy.
    let network = select_pairs(&inputs.catalog, &inputs.config);

    // 3) Emit pair lists, then the optional diagram and JSON export.
    std::fs::create_dir_all(&config.out_dir).map_err(|e| {
        AppError::output(format!("Failed to create output dir '{}': {e}", config.out_dir.display()))
    })?;
    let mut written = write_pair_lists(&config.out_dir, &inputs.catalog, &network)?;

    if config.plot {
        let path = config.out_dir.join(PLOT_FILE);
        let diagram = build_diagram(&inputs.catalog, &network);
        render_svg(&diagram, &path, PLOT_SIZE)?;
        written.push(path);
    }

    if let Some(path) = &config.export_json {
        write_network_json(path, &inputs.catalog, &inputs.config, &network)?;
        written.push(path.clone());
    }

    Ok(RunOutput {
        inputs,
        network,
        written,
    })
}
