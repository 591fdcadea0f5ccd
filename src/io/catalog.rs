//! Acquisition catalogue assembly.
//!
//! Combines the baseline table with the parameter file:
//! - applies the optional `DATE_START`/`DATE_END` window
//! - sorts by date and rejects duplicate dates
//! - resolves the reference acquisition and re-references all baselines to it
//! - resolves the identifier used to name pairs
//!
//! Every fatal input condition is raised here, before any output is written.

use std::path::Path;

use crate::domain::{Acquisition, Catalog, ReferenceSpec, SelectionConfig};
use crate::error::LoadError;
use crate::io::baseline::{BaselineRecord, BaselineTable, TableLayout, load_baseline_table};
use crate::io::prm::load_selection_config;

/// Baselines closer to zero than this count as zero when inferring the reference.
const ZERO_BASELINE_TOLERANCE: f64 = 1e-9;

/// Validated inputs for a selection run.
#[derive(Debug, Clone)]
pub struct LoadedInputs {
    pub config: SelectionConfig,
    pub catalog: Catalog,
    /// Records excluded by the date window.
    pub excluded: usize,
}

/// Load the parameter file and baseline table and build the catalogue.
pub fn load_inputs(prm_path: &Path, baseline_path: &Path) -> Result<LoadedInputs, LoadError> {
    let config = load_selection_config(prm_path)?;
    log::info!("Loaded parameter file {}", prm_path.display());

    let table = load_baseline_table(baseline_path)?;
    log::info!(
        "Loaded {} records from {} ({:?} layout)",
        table.records.len(),
        baseline_path.display(),
        table.layout
    );

    let (catalog, excluded) = build_catalog(&table, &config)?;
    Ok(LoadedInputs {
        config,
        catalog,
        excluded,
    })
}

/// Build the sorted, re-referenced catalogue from parsed records.
///
/// Returns the catalogue and the number of records dropped by the date window.
pub fn build_catalog(table: &BaselineTable, config: &SelectionConfig) -> Result<(Catalog, usize), LoadError> {
    let mut records: Vec<&BaselineRecord> = table.records.iter().collect();
    records.sort_by_key(|r| (r.date, r.line));

    for w in records.windows(2) {
        if w[0].date == w[1].date {
            return Err(LoadError::DuplicateAcquisition {
                date: w[0].date,
                first_line: w[0].line,
                second_line: w[1].line,
            });
        }
    }

    let total = records.len();
    records.retain(|r| config.date_window.contains(r.date));
    let excluded = total - records.len();
    if excluded > 0 {
        log::info!("Date window excluded {excluded} of {total} acquisitions");
    }
    if records.is_empty() {
        return Err(LoadError::InvalidConfig(
            "no acquisitions remain within DATE_START/DATE_END".to_string(),
        ));
    }

    let reference = resolve_reference(&records, table.layout, config.reference)?;
    let anchor = records[reference];

    for date in config.identifiers.keys() {
        if !records.iter().any(|r| r.date == *date) {
            log::debug!("SCENE entry for {date} matches no acquisition");
        }
    }

    let acquisitions = records
        .iter()
        .map(|r| Acquisition {
            date: r.date,
            identifier: config
                .identifiers
                .get(&r.date)
                .cloned()
                .unwrap_or_else(|| r.scene_id.clone()),
            temporal_baseline: r.temporal - anchor.temporal,
            spatial_baseline: r.perpendicular - anchor.perpendicular,
        })
        .collect();

    Ok((
        Catalog {
            acquisitions,
            reference,
        },
        excluded,
    ))
}

fn resolve_reference(records: &[&BaselineRecord], layout: TableLayout, spec: ReferenceSpec) -> Result<usize, LoadError> {
    match spec {
        ReferenceSpec::Date(date) => records.iter().position(|r| r.date == date).ok_or_else(|| {
            LoadError::MissingReference(format!(
                "DATE_MASTER {date} is not in the baseline table (or lies outside DATE_START/DATE_END)"
            ))
        }),
        ReferenceSpec::MeanBaseline => {
            let mean = records.iter().map(|r| r.perpendicular).sum::<f64>() / records.len() as f64;
            let mut best = 0;
            for (idx, r) in records.iter().enumerate() {
                if (r.perpendicular - mean).abs() < (records[best].perpendicular - mean).abs() {
                    best = idx;
                }
            }
            log::warn!(
                "Reference chosen as scene closest to mean baseline ({mean:.2} m): {} ({:.2} m)",
                records[best].date,
                records[best].perpendicular
            );
            Ok(best)
        }
        ReferenceSpec::ZeroBaseline => {
            let zero = |v: f64| v.abs() < ZERO_BASELINE_TOLERANCE;
            let candidates: Vec<usize> = records
                .iter()
                .enumerate()
                .filter(|(_, r)| {
                    zero(r.perpendicular)
                        && match layout {
                            TableLayout::Gmtsar => r.parallel.is_none_or(zero),
                            TableLayout::Compact => zero(r.temporal),
                        }
                })
                .map(|(idx, _)| idx)
                .collect();

            match candidates.as_slice() {
                [idx] => {
                    log::warn!(
                        "DATE_MASTER not set; reference inferred from zero baseline: {}",
                        records[*idx].date
                    );
                    Ok(*idx)
                }
                [] => Err(LoadError::MissingReference(
                    "no acquisition has zero baseline; set DATE_MASTER in the parameter file".to_string(),
                )),
                many => Err(LoadError::MissingReference(format!(
                    "{} acquisitions have zero baseline; set DATE_MASTER in the parameter file",
                    many.len()
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DateWindow;
    use crate::io::baseline::parse_baseline_table;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(text: &str) -> BaselineTable {
        parse_baseline_table(text, Path::new("baseline_table.dat")).unwrap()
    }

    const GMTSAR: &str = "\
S1_20150725_ALL_F1 2015205.5 1300 3.0 5.0
S1_20150126_ALL_F1 2015025.5 1120 0 0
S1_20150701_ALL_F1 2015181.5 1276 -2.0 -10.0
S1_20150607_ALL_F1 2015157.5 1252 8.0 40.0
";

    #[test]
    fn sorts_and_infers_zero_reference() {
        let (catalog, excluded) = build_catalog(&table(GMTSAR), &SelectionConfig::default()).unwrap();
        assert_eq!(excluded, 0);
        let dates: Vec<NaiveDate> = catalog.acquisitions.iter().map(|a| a.date).collect();
        assert_eq!(
            dates,
            vec![ymd(2015, 1, 26), ymd(2015, 6, 7), ymd(2015, 7, 1), ymd(2015, 7, 25)]
        );
        assert_eq!(catalog.reference, 0);
        assert_eq!(catalog.acquisitions[1].temporal_baseline, 132.0);
        assert_eq!(catalog.acquisitions[1].spatial_baseline, 40.0);
        assert_eq!(catalog.acquisitions[1].identifier, "S1_20150607_ALL_F1");
    }

    #[test]
    fn explicit_reference_rebases_baselines() {
        let config = SelectionConfig {
            reference: ReferenceSpec::Date(ymd(2015, 7, 1)),
            ..SelectionConfig::default()
        };
        let (catalog, _) = build_catalog(&table(GMTSAR), &config).unwrap();
        assert_eq!(catalog.reference, 2);
        let reference = catalog.reference_acquisition();
        assert_eq!(reference.temporal_baseline, 0.0);
        assert_eq!(reference.spatial_baseline, 0.0);
        assert_eq!(catalog.acquisitions[0].temporal_baseline, -156.0);
        assert_eq!(catalog.acquisitions[0].spatial_baseline, 10.0);
    }

    #[test]
    fn explicit_reference_must_exist() {
        let config = SelectionConfig {
            reference: ReferenceSpec::Date(ymd(2016, 1, 1)),
            ..SelectionConfig::default()
        };
        let err = build_catalog(&table(GMTSAR), &config).unwrap_err();
        assert!(matches!(err, LoadError::MissingReference(_)));
    }

    #[test]
    fn missing_zero_baseline_is_fatal() {
        let err = build_catalog(&table("20150126 0 3\n20150607 132 40\n"), &SelectionConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingReference(_)));
    }

    #[test]
    fn mean_baseline_reference() {
        let config = SelectionConfig {
            reference: ReferenceSpec::MeanBaseline,
            ..SelectionConfig::default()
        };
        // Mean perpendicular baseline is 8.75 m; 2015-07-25 (5 m) is closest.
        let (catalog, _) = build_catalog(&table(GMTSAR), &config).unwrap();
        assert_eq!(catalog.reference, 3);
        assert_eq!(catalog.acquisitions[0].spatial_baseline, -5.0);
    }

    #[test]
    fn duplicate_dates_are_fatal() {
        let err = build_catalog(
            &table("20150126 0 0\n20150607 132 40\n20150607 132 41\n"),
            &SelectionConfig::default(),
        )
        .unwrap_err();
        match err {
            LoadError::DuplicateAcquisition {
                date,
                first_line,
                second_line,
            } => {
                assert_eq!(date, ymd(2015, 6, 7));
                assert_eq!((first_line, second_line), (2, 3));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn date_window_and_identifier_overrides() {
        let mut config = SelectionConfig {
            date_window: DateWindow {
                start: None,
                end: Some(ymd(2015, 7, 1)),
            },
            ..SelectionConfig::default()
        };
        config
            .identifiers
            .insert(ymd(2015, 6, 7), "S1_20150607_ALL_F2".to_string());

        let (catalog, excluded) = build_catalog(&table(GMTSAR), &config).unwrap();
        assert_eq!(excluded, 1);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.acquisitions[1].identifier, "S1_20150607_ALL_F2");
        assert_eq!(catalog.acquisitions[2].identifier, "S1_20150701_ALL_F1");
    }
}
