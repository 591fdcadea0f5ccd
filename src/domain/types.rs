//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during pair selection
//! - exported to JSON / text pair lists
//! - handed to the diagram renderer as plain data

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date format used in pair names (`YYYYMMDD_YYYYMMDD`).
pub const PAIR_DATE_FORMAT: &str = "%Y%m%d";

/// One SAR scene in the time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acquisition {
    pub date: NaiveDate,
    /// Naming token used in `intf.in` (sensor/orbit/subswath metadata, opaque).
    pub identifier: String,
    /// Signed offset in days relative to the reference acquisition.
    pub temporal_baseline: f64,
    /// Signed perpendicular baseline in meters relative to the reference acquisition.
    pub spatial_baseline: f64,
}

impl Acquisition {
    pub fn day_of_year(&self) -> u32 {
        self.date.ordinal()
    }

    pub fn date_token(&self) -> String {
        self.date.format(PAIR_DATE_FORMAT).to_string()
    }
}

/// An interferogram pair as indices into the sorted acquisition list.
///
/// `master` precedes `slave` in time, except for pairs produced by
/// [`SelectionPolicy::Reference`] where the master is always the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub master: usize,
    pub slave: usize,
}

impl Pair {
    pub fn new(master: usize, slave: usize) -> Self {
        Self { master, slave }
    }

    /// Index pair with the smaller index first (identity of the unordered pair).
    pub fn unordered_key(self) -> (usize, usize) {
        (self.master.min(self.slave), self.master.max(self.slave))
    }
}

/// A pair-generation rule plus its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Chain topology: each acquisition with its immediate successor.
    Sequential,
    /// Each acquisition with every successor at most `n` positions later.
    Skip { n: usize },
    /// Seasonal pairs: same day-of-year (± tolerance) in a different year.
    YearToYear { tolerance_days: u32 },
    /// Chain of long pairs hopping through a yearly day-of-year window.
    Long { window_start: u32, window_end: u32 },
    /// Star network: the reference with every other acquisition.
    Reference,
    /// All pairs that satisfy the baseline thresholds.
    Threshold,
}

impl SelectionPolicy {
    /// Output file suffix (`intf.in.<suffix>`).
    pub fn suffix(&self) -> String {
        match self {
            SelectionPolicy::Sequential => "sequential".to_string(),
            SelectionPolicy::Skip { n } => format!("skip_{n}"),
            SelectionPolicy::YearToYear { .. } => "y2y".to_string(),
            SelectionPolicy::Long { .. } => "long".to_string(),
            SelectionPolicy::Reference => "ref".to_string(),
            SelectionPolicy::Threshold => "bl".to_string(),
        }
    }

    /// Human-readable label for terminal output and the diagram legend.
    pub fn display_name(&self) -> String {
        match self {
            SelectionPolicy::Sequential => "Sequential".to_string(),
            SelectionPolicy::Skip { n } => format!("Skip-{n}"),
            SelectionPolicy::YearToYear { tolerance_days } => format!("Year-to-year (±{tolerance_days}d)"),
            SelectionPolicy::Long { window_start, window_end } => {
                format!("Long (DOY {window_start}-{window_end})")
            }
            SelectionPolicy::Reference => "Reference star".to_string(),
            SelectionPolicy::Threshold => "Baseline-constrained".to_string(),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Baseline limits every selected pair must satisfy.
///
/// `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Maximum absolute perpendicular baseline difference (m).
    pub max_spatial: Option<f64>,
    /// Minimum absolute temporal separation (days).
    pub min_temporal: Option<f64>,
    /// Maximum absolute temporal separation (days).
    pub max_temporal: Option<f64>,
}

impl Thresholds {
    pub fn is_unbounded(&self) -> bool {
        self.max_spatial.is_none() && self.min_temporal.is_none() && self.max_temporal.is_none()
    }

    pub fn accepts(&self, a: &Acquisition, b: &Acquisition) -> bool {
        let d_spatial = (a.spatial_baseline - b.spatial_baseline).abs();
        let d_temporal = (a.temporal_baseline - b.temporal_baseline).abs();

        self.max_spatial.is_none_or(|max| d_spatial <= max)
            && self.min_temporal.is_none_or(|min| d_temporal >= min)
            && self.max_temporal.is_none_or(|max| d_temporal <= max)
    }
}

/// How the reference ("supermaster") acquisition is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum ReferenceSpec {
    /// `DATE_MASTER` names the reference date explicitly.
    Date(NaiveDate),
    /// Scene with the perpendicular baseline closest to the stack mean.
    MeanBaseline,
    /// Scene with zero baseline in the table.
    #[default]
    ZeroBaseline,
}

/// Inclusive date window restricting the catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }

    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Validated parameter-file contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionConfig {
    /// Active policies, in canonical output order.
    pub policies: Vec<SelectionPolicy>,
    pub thresholds: Thresholds,
    pub reference: ReferenceSpec,
    pub date_window: DateWindow,
    /// `SCENE = <date> <identifier>` records.
    pub identifiers: BTreeMap<NaiveDate, String>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub prm_path: PathBuf,
    pub baseline_path: PathBuf,
    pub out_dir: PathBuf,
    pub plot: bool,
    pub export_json: Option<PathBuf>,
}

/// The loaded, validated acquisition catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Sorted ascending by date, unique dates.
    pub acquisitions: Vec<Acquisition>,
    /// Index of the reference acquisition.
    pub reference: usize,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.acquisitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acquisitions.is_empty()
    }

    pub fn reference_acquisition(&self) -> &Acquisition {
        &self.acquisitions[self.reference]
    }
}

/// Pairs selected by one policy after threshold filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyPairs {
    pub policy: SelectionPolicy,
    /// Sorted by (master date, slave date), no duplicates.
    pub pairs: Vec<Pair>,
    /// Number of topological candidates dropped by the thresholds.
    pub dropped: usize,
}

/// Output of a selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairNetwork {
    pub per_policy: Vec<PolicyPairs>,
    /// Union of all policy sets, same ordering rule.
    pub superset: Vec<Pair>,
}

/// A saved network file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkFile {
    pub tool: String,
    pub reference: NaiveDate,
    pub thresholds: Thresholds,
    pub acquisitions: Vec<Acquisition>,
    pub policies: Vec<PolicyFile>,
    /// Superset pairs as `YYYYMMDD_YYYYMMDD`.
    pub superset: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyFile {
    pub policy: SelectionPolicy,
    pub suffix: String,
    pub dropped: usize,
    pub pairs: Vec<String>,
}
