//! Pair-list and network exports.
//!
//! Text lists are what the downstream GMTSAR scripts consume:
//! - `short.dat`: `YYYYMMDD_YYYYMMDD` per pair
//! - `intf.in`: `IDENTIFIER1:IDENTIFIER2` per pair
//! - `intf.in.<suffix>` / `short.dat.<suffix>`: the same, per policy
//!
//! The optional JSON export is for auditing a run; its schema is
//! `domain::NetworkFile`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::domain::{Catalog, NetworkFile, Pair, PairNetwork, PolicyFile, SelectionConfig};
use crate::error::AppError;

pub const SHORT_LIST: &str = "short.dat";
pub const INTF_LIST: &str = "intf.in";

/// `YYYYMMDD_YYYYMMDD` for one pair.
pub fn short_name(catalog: &Catalog, pair: Pair) -> String {
    format!(
        "{}_{}",
        catalog.acquisitions[pair.master].date_token(),
        catalog.acquisitions[pair.slave].date_token()
    )
}

/// `IDENTIFIER1:IDENTIFIER2` for one pair.
pub fn intf_name(catalog: &Catalog, pair: Pair) -> String {
    format!(
        "{}:{}",
        catalog.acquisitions[pair.master].identifier,
        catalog.acquisitions[pair.slave].identifier
    )
}

/// Write every pair list into `out_dir` and return the paths written.
pub fn write_pair_lists(out_dir: &Path, catalog: &Catalog, network: &PairNetwork) -> Result<Vec<PathBuf>, AppError> {
    let mut written = Vec::new();

    written.push(write_list(&out_dir.join(SHORT_LIST), catalog, &network.superset, short_name)?);
    written.push(write_list(&out_dir.join(INTF_LIST), catalog, &network.superset, intf_name)?);

    for set in &network.per_policy {
        let suffix = set.policy.suffix();
        written.push(write_list(
            &out_dir.join(format!("{INTF_LIST}.{suffix}")),
            catalog,
            &set.pairs,
            intf_name,
        )?);
        written.push(write_list(
            &out_dir.join(format!("{SHORT_LIST}.{suffix}")),
            catalog,
            &set.pairs,
            short_name,
        )?);
    }

    Ok(written)
}

fn write_list(path: &Path, catalog: &Catalog, pairs: &[Pair], name: fn(&Catalog, Pair) -> String) -> Result<PathBuf, AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    for &pair in pairs {
        writeln!(out, "{}", name(catalog, pair))
            .map_err(|e| AppError::output(format!("Failed to write '{}': {e}", path.display())))?;
    }
    out.flush()
        .map_err(|e| AppError::output(format!("Failed to write '{}': {e}", path.display())))?;

    log::debug!("Wrote {} line(s) to {}", pairs.len(), path.display());
    Ok(path.to_path_buf())
}

/// Build the JSON-serializable view of a run.
pub fn network_file(catalog: &Catalog, config: &SelectionConfig, network: &PairNetwork) -> NetworkFile {
    NetworkFile {
        tool: "baseline-net".to_string(),
        reference: catalog.reference_acquisition().date,
        thresholds: config.thresholds,
        acquisitions: catalog.acquisitions.clone(),
        policies: network
            .per_policy
            .iter()
            .map(|set| PolicyFile {
                policy: set.policy,
                suffix: set.policy.suffix(),
                dropped: set.dropped,
                pairs: set.pairs.iter().map(|&p| short_name(catalog, p)).collect(),
            })
            .collect(),
        superset: network.superset.iter().map(|&p| short_name(catalog, p)).collect(),
    }
}

/// Write the network JSON file.
pub fn write_network_json(
    path: &Path,
    catalog: &Catalog,
    config: &SelectionConfig,
    network: &PairNetwork,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create network JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(BufWriter::new(file), &network_file(catalog, config, network))
        .map_err(|e| AppError::output(format!("Failed to write network JSON: {e}")))?;

    Ok(())
}
