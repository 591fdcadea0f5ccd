//! Baseline diagram geometry.
//!
//! Pure data: acquisitions become points at (date, perpendicular baseline) and
//! each selected pair becomes a segment between its two endpoints. The renderer
//! in `svg` only draws what is computed here.
//!
//! The x coordinate is days since the first acquisition so the geometry stays
//! plain `f64` pairs.

use chrono::{Duration, NaiveDate};

use crate::domain::{Catalog, PairNetwork};

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramPoint {
    pub x: f64,
    pub y: f64,
    /// `YYYY/MM/DD` label drawn next to the point.
    pub label: String,
    pub is_reference: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramSegment {
    /// Index into `Diagram::series`.
    pub series: usize,
    pub from: (f64, f64),
    pub to: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    /// Date at x = 0.
    pub origin: NaiveDate,
    pub points: Vec<DiagramPoint>,
    /// One legend label per active policy, in policy order.
    pub series: Vec<String>,
    /// Per policy in order, then per pair in list order.
    pub segments: Vec<DiagramSegment>,
}

impl Diagram {
    /// Padded plot bounds `(x0, x1, y0, y1)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in &self.points {
            x0 = x0.min(p.x);
            x1 = x1.max(p.x);
            y0 = y0.min(p.y);
            y1 = y1.max(p.y);
        }
        if !(x0.is_finite() && x1.is_finite()) {
            return (-1.0, 1.0, -1.0, 1.0);
        }

        let x_pad = 0.05 * (x1 - x0).max(10.0);
        let y_pad = 0.10 * (y1 - y0).max(10.0);
        (x0 - x_pad, x1 + x_pad, y0 - y_pad, y1 + y_pad)
    }

    /// Calendar date at an x coordinate (for tick labels).
    pub fn date_at(&self, x: f64) -> NaiveDate {
        self.origin + Duration::days(x.round() as i64)
    }
}

pub fn build_diagram(catalog: &Catalog, network: &PairNetwork) -> Diagram {
    let acq = &catalog.acquisitions;
    let origin = acq.first().map(|a| a.date).unwrap_or_default();

    let points: Vec<DiagramPoint> = acq
        .iter()
        .enumerate()
        .map(|(idx, a)| DiagramPoint {
            x: (a.date - origin).num_days() as f64,
            y: a.spatial_baseline,
            label: a.date.format("%Y/%m/%d").to_string(),
            is_reference: idx == catalog.reference,
        })
        .collect();

    let mut series = Vec::with_capacity(network.per_policy.len());
    let mut segments = Vec::new();
    for (series_idx, set) in network.per_policy.iter().enumerate() {
        series.push(set.policy.display_name());
        for pair in &set.pairs {
            let (m, s) = (&points[pair.master], &points[pair.slave]);
            segments.push(DiagramSegment {
                series: series_idx,
                from: (m.x, m.y),
                to: (s.x, s.y),
            });
        }
    }

    Diagram {
        origin,
        points,
        series,
        segments,
    }
}
