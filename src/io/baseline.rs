//! Baseline table parsing.
//!
//! Two whitespace-delimited layouts are accepted; the first record decides which
//! one the whole file uses:
//!
//! - GMTSAR `baseline_table.dat`: `scene_id sar_time sar_day b_para b_perp`
//! - compact: `identifier-or-date temporal_days perpendicular_m`
//!
//! Acquisition dates are extracted from the first field. Records are returned
//! in file order; sorting and validation across records happen in `catalog`.

use std::path::Path;

use chrono::NaiveDate;

use crate::error::LoadError;

/// Column layout of a baseline table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// `scene_id sar_time sar_day b_para b_perp`
    Gmtsar,
    /// `identifier-or-date temporal spatial`
    Compact,
}

impl TableLayout {
    pub fn field_count(self) -> usize {
        match self {
            TableLayout::Gmtsar => 5,
            TableLayout::Compact => 3,
        }
    }

    fn from_field_count(n: usize) -> Option<Self> {
        match n {
            5 => Some(TableLayout::Gmtsar),
            3 => Some(TableLayout::Compact),
            _ => None,
        }
    }
}

/// One parsed table record, before re-referencing.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineRecord {
    /// 1-based line in the source file.
    pub line: usize,
    /// First field as written (scene id or bare date).
    pub scene_id: String,
    pub date: NaiveDate,
    /// Temporal coordinate in days (`sar_day` or the compact temporal column).
    pub temporal: f64,
    /// Perpendicular baseline in meters.
    pub perpendicular: f64,
    /// Parallel baseline (GMTSAR layout only).
    pub parallel: Option<f64>,
}

/// Parsed baseline table.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineTable {
    pub layout: TableLayout,
    pub records: Vec<BaselineRecord>,
}

/// Read and parse a baseline table from disk.
pub fn load_baseline_table(path: &Path) -> Result<BaselineTable, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_baseline_table(&text, path)
}

/// Parse baseline table text. `path` is only used in error messages.
pub fn parse_baseline_table(text: &str, path: &Path) -> Result<BaselineTable, LoadError> {
    let mut layout: Option<TableLayout> = None;
    let mut records = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = content.split_whitespace().collect();
        let current = match layout {
            Some(expected) if fields.len() != expected.field_count() => {
                return Err(LoadError::parse(
                    path,
                    line,
                    format!("expected {} fields, found {}", expected.field_count(), fields.len()),
                ));
            }
            Some(expected) => expected,
            None => TableLayout::from_field_count(fields.len()).ok_or_else(|| {
                LoadError::parse(
                    path,
                    line,
                    format!("expected 5 (GMTSAR) or 3 (compact) fields, found {}", fields.len()),
                )
            })?,
        };
        layout = Some(current);

        records.push(parse_record(&fields, current, line, path)?);
    }

    let Some(layout) = layout else {
        return Err(LoadError::parse(path, 0, "baseline table contains no records"));
    };

    Ok(BaselineTable { layout, records })
}

fn parse_record(fields: &[&str], layout: TableLayout, line: usize, path: &Path) -> Result<BaselineRecord, LoadError> {
    let scene_id = fields[0];
    let date = scene_date(scene_id)
        .ok_or_else(|| LoadError::parse(path, line, format!("cannot identify acquisition date in `{scene_id}`")))?;

    let number = |idx: usize, name: &str| -> Result<f64, LoadError> {
        let raw = fields[idx];
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(LoadError::parse(
                path,
                line,
                format!("non-numeric {name} `{raw}`"),
            )),
        }
    };

    let record = match layout {
        TableLayout::Gmtsar => {
            // sar_time (column 2) is validated but not used.
            number(1, "sar_time")?;
            BaselineRecord {
                line,
                scene_id: scene_id.to_string(),
                date,
                temporal: number(2, "sar_day")?,
                parallel: Some(number(3, "parallel baseline")?),
                perpendicular: number(4, "perpendicular baseline")?,
            }
        }
        TableLayout::Compact => BaselineRecord {
            line,
            scene_id: scene_id.to_string(),
            date,
            temporal: number(1, "temporal baseline")?,
            perpendicular: number(2, "spatial baseline")?,
            parallel: None,
        },
    };
    Ok(record)
}

/// Extract the acquisition date from a scene identifier.
///
/// Recognised forms:
/// - bare `YYYYMMDD`
/// - Sentinel-1 ids (contain `S1`/`s1`): the first 8-digit run that is a valid date
/// - ALOS-2 ids: `-`-separated, 4th token is `YYMMDD`
pub fn scene_date(scene_id: &str) -> Option<NaiveDate> {
    if scene_id.len() == 8 && scene_id.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(scene_id, "%Y%m%d").ok();
    }

    if scene_id.contains("S1") || scene_id.contains("s1") {
        return scene_id
            .as_bytes()
            .windows(8)
            .enumerate()
            .filter(|(_, w)| w.iter().all(|b| b.is_ascii_digit()))
            .find_map(|(start, _)| NaiveDate::parse_from_str(&scene_id[start..start + 8], "%Y%m%d").ok());
    }

    if scene_id.contains("ALOS2") {
        let token = scene_id.split('-').nth(3)?;
        return NaiveDate::parse_from_str(token, "%y%m%d").ok();
    }

    None
}
