//! Formatted terminal output for a selection run.
//!
//! We keep formatting code in one place so:
//! - the selection code stays clean and testable
//! - output changes are localized (snapshot tests below)

use crate::domain::{Catalog, PairNetwork, SelectionConfig, Thresholds};

/// Format the run summary (catalogue + thresholds + per-policy counts).
pub fn format_run_summary(catalog: &Catalog, config: &SelectionConfig, network: &PairNetwork, excluded: usize) -> String {
    let mut out = String::new();

    out.push_str("=== baseline-net - Interferogram Pair Selection ===\n");
    out.push_str(&format!("Scenes: n={}", catalog.len()));
    if excluded > 0 {
        out.push_str(&format!(" ({excluded} outside date window)"));
    }
    out.push('\n');

    if let (Some(first), Some(last)) = (catalog.acquisitions.first(), catalog.acquisitions.last()) {
        out.push_str(&format!("Span: {} .. {}\n", first.date, last.date));
    }
    out.push_str(&format!(
        "Reference: {} ({})\n",
        catalog.reference_acquisition().date,
        catalog.reference_acquisition().identifier
    ));
    out.push_str(&format!("Thresholds: {}\n", format_thresholds(&config.thresholds)));

    out.push_str("\nPolicies:\n");
    for set in &network.per_policy {
        out.push_str(&format!(
            "  {:<28} {:>5} pairs",
            set.policy.display_name(),
            set.pairs.len()
        ));
        if set.dropped > 0 {
            out.push_str(&format!("  ({} dropped by thresholds)", set.dropped));
        }
        out.push('\n');
    }

    out.push_str(&format!("\nTotal number of interferograms = {}\n", network.superset.len()));
    out
}

fn format_thresholds(t: &Thresholds) -> String {
    if t.is_unbounded() {
        return "none".to_string();
    }
    let limit = |v: Option<f64>| v.map(|v| format!("{v}")).unwrap_or_else(|| "-".to_string());
    format!(
        "|dB| <= {} m, {} <= |dt| <= {} days",
        limit(t.max_spatial),
        limit(t.min_temporal),
        limit(t.max_temporal)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SelectionPolicy;
    use crate::network::select_pairs;
    use crate::network::test_support::scenario_catalog;

    #[test]
    fn summary_golden_snapshot() {
        let catalog = scenario_catalog();
        let config = SelectionConfig {
            policies: vec![SelectionPolicy::Sequential, SelectionPolicy::Skip { n: 2 }],
            thresholds: Thresholds {
                max_spatial: Some(45.0),
                min_temporal: None,
                max_temporal: Some(200.0),
            },
            ..SelectionConfig::default()
        };
        let network = select_pairs(&catalog, &config);

        let txt = format_run_summary(&catalog, &config, &network, 0);
        let expected = concat!(
            "=== baseline-net - Interferogram Pair Selection ===\n",
            "Scenes: n=4\n",
            "Span: 2015-01-26 .. 2015-07-25\n",
            "Reference: 2015-01-26 (S1_20150126_ALL_F1)\n",
            "Thresholds: |dB| <= 45 m, - <= |dt| <= 200 days\n",
            "\n",
            "Policies:\n",
            "  Sequential                       2 pairs  (1 dropped by thresholds)\n",
            "  Skip-2                           4 pairs  (1 dropped by thresholds)\n",
            "\n",
            "Total number of interferograms = 4\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn unbounded_thresholds_read_none() {
        assert_eq!(format_thresholds(&Thresholds::default()), "none");
    }
}
