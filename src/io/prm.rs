//! Parameter (PRM) file parsing and template generation.
//!
//! The parameter file follows the GMTSAR convention of one `KEY = VALUE`
//! assignment per line, with `#` starting a comment. It carries the pair
//! selection toggles, the baseline thresholds, the reference choice and any
//! per-date scene identifiers.
//!
//! Keys are case-insensitive. A key assigned twice keeps the last value, except
//! `SCENE` which accumulates.

use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{DateWindow, ReferenceSpec, SelectionConfig, SelectionPolicy, Thresholds};
use crate::error::LoadError;

pub const DEFAULT_Y2Y_TOLERANCE_DAYS: u32 = 30;
pub const DEFAULT_LONG_START: u32 = 150;
pub const DEFAULT_LONG_END: u32 = 270;

/// Accepted date spellings for `DATE_*` and `SCENE` values.
const DATE_FORMATS: [&str; 3] = ["%Y%m%d", "%Y/%m/%d", "%Y-%m-%d"];

/// One `KEY = VALUE` assignment with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: String,
    value: String,
    line: usize,
}

/// Read and validate a parameter file.
pub fn load_selection_config(path: &Path) -> Result<SelectionConfig, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_selection_config(&text, path)
}

/// Parse parameter-file text. `path` is only used in error messages.
pub fn parse_selection_config(text: &str, path: &Path) -> Result<SelectionConfig, LoadError> {
    let entries = tokenize(text, path)?;
    let mut builder = ConfigBuilder::default();
    for entry in &entries {
        builder.apply(entry, path)?;
    }
    builder.finish()
}

fn tokenize(text: &str, path: &Path) -> Result<Vec<Entry>, LoadError> {
    let mut entries = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let content = content.trim();
        if content.is_empty() {
            continue;
        }

        let Some((key, value)) = content.split_once('=') else {
            return Err(LoadError::parse(path, line, format!("expected `KEY = VALUE`, found `{content}`")));
        };
        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(LoadError::parse(path, line, format!("invalid key `{key}`")));
        }

        entries.push(Entry {
            key: key.to_ascii_uppercase(),
            value: value.trim().to_string(),
            line,
        });
    }
    Ok(entries)
}

/// Accumulates raw settings before validation.
#[derive(Debug, Default)]
struct ConfigBuilder {
    sequential: bool,
    skip: usize,
    y2y: bool,
    y2y_tolerance: Option<u32>,
    long: bool,
    long_start: Option<u32>,
    long_end: Option<u32>,
    reference_pairs: bool,
    bl_mode: u8,
    thresholds: Thresholds,
    reference: ReferenceSpec,
    date_window: DateWindow,
    identifiers: Vec<(NaiveDate, String, usize)>,
}

impl ConfigBuilder {
    fn apply(&mut self, entry: &Entry, path: &Path) -> Result<(), LoadError> {
        let err = |message: String| LoadError::parse(path, entry.line, message);
        let value = entry.value.as_str();

        match entry.key.as_str() {
            "SEQUENTIAL" | "SEQ" => self.sequential = parse_flag(value).map_err(err)?,
            "SKIP" => self.skip = parse_count(value).map_err(err)?,
            "Y2Y_INTFS" | "Y2Y" => self.y2y = parse_flag(value).map_err(err)?,
            "Y2Y_TOLERANCE" => {
                let days = parse_count(value).map_err(err)?;
                if days > 183 {
                    return Err(LoadError::parse(
                        path,
                        entry.line,
                        format!("Y2Y_TOLERANCE must be within 0..=183 days, got {days}"),
                    ));
                }
                self.y2y_tolerance = Some(days as u32);
            }
            "LONG" => self.long = parse_flag(value).map_err(err)?,
            "LONG_START" => self.long_start = Some(parse_day_of_year(value).map_err(err)?),
            "LONG_END" => self.long_end = Some(parse_day_of_year(value).map_err(err)?),
            "REFERENCE_PAIRS" => self.reference_pairs = parse_flag(value).map_err(err)?,
            "BL_MODE" => {
                let mode = parse_count(value).map_err(err)?;
                if mode > 2 {
                    return Err(LoadError::parse(
                        path,
                        entry.line,
                        format!("BL_MODE must be 0, 1 or 2, got {mode}"),
                    ));
                }
                self.bl_mode = mode as u8;
            }
            "BP_MAX" => self.thresholds.max_spatial = parse_limit(value).map_err(err)?,
            "DT_MIN" => self.thresholds.min_temporal = parse_limit(value).map_err(err)?,
            "DT_MAX" => self.thresholds.max_temporal = parse_limit(value).map_err(err)?,
            "DATE_MASTER" => self.reference = parse_reference(value).map_err(err)?,
            "DATE_START" => self.date_window.start = parse_optional_date(value).map_err(err)?,
            "DATE_END" => self.date_window.end = parse_optional_date(value).map_err(err)?,
            "SCENE" => {
                let mut tokens = value.split_whitespace();
                let (Some(date), Some(identifier), None) = (tokens.next(), tokens.next(), tokens.next()) else {
                    return Err(err(format!("expected `SCENE = <YYYYMMDD> <IDENTIFIER>`, found `{value}`")));
                };
                let date = parse_date(date).ok_or_else(|| err(format!("invalid scene date `{date}`")))?;
                self.identifiers.push((date, identifier.to_string(), entry.line));
            }
            other => log::debug!("{}:{}: ignoring unknown key `{other}`", path.display(), entry.line),
        }
        Ok(())
    }

    fn finish(self) -> Result<SelectionConfig, LoadError> {
        let mut policies = Vec::new();
        if self.sequential {
            policies.push(SelectionPolicy::Sequential);
        }
        if self.skip > 0 {
            policies.push(SelectionPolicy::Skip { n: self.skip });
        }
        if self.y2y {
            policies.push(SelectionPolicy::YearToYear {
                tolerance_days: self.y2y_tolerance.unwrap_or(DEFAULT_Y2Y_TOLERANCE_DAYS),
            });
        }
        if self.long {
            let window_start = self.long_start.unwrap_or(DEFAULT_LONG_START);
            let window_end = self.long_end.unwrap_or(DEFAULT_LONG_END);
            if window_start > window_end {
                return Err(LoadError::InvalidConfig(format!(
                    "LONG_START ({window_start}) must not exceed LONG_END ({window_end})"
                )));
            }
            policies.push(SelectionPolicy::Long { window_start, window_end });
        }
        if self.reference_pairs {
            policies.push(SelectionPolicy::Reference);
        }
        if self.bl_mode == 1 {
            policies.push(SelectionPolicy::Threshold);
        }

        if policies.is_empty() {
            return Err(LoadError::InvalidConfig(
                "no selection policy enabled (set SEQUENTIAL, SKIP, Y2Y_INTFS, LONG, REFERENCE_PAIRS or BL_MODE = 1)"
                    .to_string(),
            ));
        }

        if let (Some(min), Some(max)) = (self.thresholds.min_temporal, self.thresholds.max_temporal) {
            if min > max {
                return Err(LoadError::InvalidConfig(format!(
                    "DT_MIN ({min}) must not exceed DT_MAX ({max})"
                )));
            }
        }

        if let (Some(start), Some(end)) = (self.date_window.start, self.date_window.end) {
            if start > end {
                return Err(LoadError::InvalidConfig(format!(
                    "DATE_START ({start}) must not be after DATE_END ({end})"
                )));
            }
        }

        let mut identifiers = std::collections::BTreeMap::new();
        for (date, identifier, line) in self.identifiers {
            if let Some(previous) = identifiers.insert(date, identifier) {
                log::warn!("SCENE for {date} redefined on line {line} (was `{previous}`)");
            }
        }

        Ok(SelectionConfig {
            policies,
            thresholds: self.thresholds,
            reference: self.reference,
            date_window: self.date_window,
            identifiers,
        })
    }
}

fn parse_number(value: &str) -> Result<f64, String> {
    let v: f64 = value
        .parse()
        .map_err(|_| format!("expected a number, found `{value}`"))?;
    if !v.is_finite() {
        return Err(format!("expected a finite number, found `{value}`"));
    }
    Ok(v)
}

fn parse_flag(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => parse_number(value).map(|v| v != 0.0),
    }
}

/// Non-negative integer; `2` and `2.0` are both accepted.
fn parse_count(value: &str) -> Result<usize, String> {
    let v = parse_number(value)?;
    if v < 0.0 || v.fract() != 0.0 {
        return Err(format!("expected a non-negative integer, found `{value}`"));
    }
    Ok(v as usize)
}

fn parse_day_of_year(value: &str) -> Result<u32, String> {
    let v = parse_count(value)?;
    if !(1..=366).contains(&v) {
        return Err(format!("day of year must be within 1..=366, found {v}"));
    }
    Ok(v as u32)
}

/// Threshold value; `None`/empty leaves the limit unbounded.
fn parse_limit(value: &str) -> Result<Option<f64>, String> {
    if is_none_token(value) {
        return Ok(None);
    }
    let v = parse_number(value)?;
    if v < 0.0 {
        return Err(format!("limit must be non-negative, found {v}"));
    }
    Ok(Some(v))
}

fn parse_reference(value: &str) -> Result<ReferenceSpec, String> {
    if is_none_token(value) {
        return Ok(ReferenceSpec::ZeroBaseline);
    }
    match value.to_ascii_lowercase().as_str() {
        "auto" | "mean" => Ok(ReferenceSpec::MeanBaseline),
        _ => parse_date(value)
            .map(ReferenceSpec::Date)
            .ok_or_else(|| format!("invalid DATE_MASTER `{value}` (expected YYYYMMDD, auto or None)")),
    }
}

fn parse_optional_date(value: &str) -> Result<Option<NaiveDate>, String> {
    if is_none_token(value) {
        return Ok(None);
    }
    parse_date(value)
        .map(Some)
        .ok_or_else(|| format!("invalid date `{value}`"))
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

fn is_none_token(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("none")
}

/// Render a commented parameter file with the given thresholds.
pub fn render_template(dt_min: f64, dt_max: f64, bp_max: f64) -> String {
    let mut text = String::new();
    text.push_str("# ---------- Dates ----------\n");
    text.push_str("DATE_START  = None   # Earliest scene date to use (YYYYMMDD)\n");
    text.push_str("DATE_END    = None   # Latest scene date to use (YYYYMMDD)\n");
    text.push_str("DATE_MASTER = None   # Reference date (YYYYMMDD), auto (closest to mean baseline) or None (zero baseline)\n");
    text.push('\n');
    text.push_str("# ---------- Pair types ----------\n");
    text.push_str("# For all options, set to 0 to leave out of the selection\n");
    text.push('\n');
    text.push_str("SEQUENTIAL      = 1    # Pair every scene with the next one\n");
    text.push_str("SKIP            = 2    # Pair every scene with the next N scenes\n");
    text.push_str(&format!(
        "Y2Y_INTFS       = 1    # Pair scenes one or more years apart at the same time of year\n\
         Y2Y_TOLERANCE   = {DEFAULT_Y2Y_TOLERANCE_DAYS}   # Day-of-year tolerance for year-to-year pairs\n"
    ));
    text.push_str("LONG            = 0    # Chain of long pairs connecting the first and last scenes\n");
    text.push_str(&format!(
        "LONG_START      = {DEFAULT_LONG_START}  # Earliest day of year for long-pair scenes (1-366)\n\
         LONG_END        = {DEFAULT_LONG_END}  # Latest day of year for long-pair scenes (1-366)\n"
    ));
    text.push_str("REFERENCE_PAIRS = 0    # Pair every scene with the reference\n");
    text.push('\n');
    text.push_str("# ---------- Baseline constraints ----------\n");
    text.push_str("# The limits below always filter every selected pair.\n");
    text.push_str("# BL_MODE = 1 additionally makes every pair that satisfies them.\n");
    text.push('\n');
    text.push_str("BL_MODE = 0\n");
    text.push_str(&format!("BP_MAX  = {bp_max}   # Maximum perpendicular baseline (m)\n"));
    text.push_str(&format!("DT_MIN  = {dt_min}   # Minimum interferogram epoch length (days)\n"));
    text.push_str(&format!("DT_MAX  = {dt_max}   # Maximum interferogram epoch length (days)\n"));
    text.push('\n');
    text.push_str("# ---------- Scene identifiers ----------\n");
    text.push_str("# SCENE = 20150126 S1_20150126_ALL_F1\n");
    text
}

/// Write `<name>.PRM` into `out_dir` and return its path.
pub fn write_template(
    out_dir: &Path,
    name: &str,
    dt_min: f64,
    dt_max: f64,
    bp_max: f64,
) -> Result<std::path::PathBuf, crate::error::AppError> {
    let path = out_dir.join(format!("{name}.PRM"));
    std::fs::write(&path, render_template(dt_min, dt_max, bp_max)).map_err(|e| {
        crate::error::AppError::output(format!("Failed to write parameter file '{}': {e}", path.display()))
    })?;
    Ok(path)
}
