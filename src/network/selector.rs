//! Pair selection over a sorted acquisition catalogue.
//!
//! Each policy first generates its topological candidates, then every candidate
//! is checked against the baseline thresholds. Rules:
//! 1. Sequential: `(i, i+1)`
//! 2. Skip-N: `(i, j)` for `i < j <= i + N`
//! 3. Year-to-year: `(i, j)` in different calendar years whose days of year are
//!    within tolerance of each other, measured around the year boundary
//! 4. Long: chain through a yearly day-of-year window (see `long`)
//! 5. Reference: `(reference, k)` for every other `k`
//! 6. Threshold: every `(i, j)`, `i < j`
//!
//! Output sets are sorted by (master date, slave date) and free of duplicates.

use std::collections::BTreeSet;

use chrono::Datelike;

use crate::domain::{Catalog, Pair, PairNetwork, PolicyPairs, SelectionConfig, SelectionPolicy, Thresholds};
use crate::network::long::long_chain;

/// Length of the day-of-year circle used for year-to-year matching.
const DAYS_PER_YEAR: u32 = 365;

/// Run every configured policy and collect the superset.
pub fn select_pairs(catalog: &Catalog, config: &SelectionConfig) -> PairNetwork {
    let mut per_policy = Vec::with_capacity(config.policies.len());

    for policy in &config.policies {
        let candidates = topology(policy, catalog, &config.thresholds);
        let set = apply_thresholds(*policy, candidates, catalog, &config.thresholds);

        if set.dropped > 0 {
            log::warn!(
                "{policy}: {} candidate pair(s) dropped by baseline thresholds",
                set.dropped
            );
        }
        if set.pairs.is_empty() {
            log::warn!("{policy}: no pairs selected; writing empty intf.in.{}", policy.suffix());
        } else {
            log::info!("{policy}: {} pair(s)", set.pairs.len());
        }
        per_policy.push(set);
    }

    let superset = union(catalog, per_policy.iter().map(|p| p.pairs.as_slice()));
    PairNetwork { per_policy, superset }
}

/// Topological candidates for one policy, before threshold filtering.
pub fn topology(policy: &SelectionPolicy, catalog: &Catalog, thresholds: &Thresholds) -> Vec<Pair> {
    let n = catalog.len();
    match *policy {
        SelectionPolicy::Sequential => skip_pairs(n, 1),
        SelectionPolicy::Skip { n: skip } => skip_pairs(n, skip),
        SelectionPolicy::YearToYear { tolerance_days } => year_to_year_pairs(catalog, tolerance_days),
        SelectionPolicy::Long { window_start, window_end } => long_chain(catalog, window_start, window_end),
        SelectionPolicy::Reference => (0..n)
            .filter(|&k| k != catalog.reference)
            .map(|k| Pair::new(catalog.reference, k))
            .collect(),
        SelectionPolicy::Threshold => {
            let acq = &catalog.acquisitions;
            all_pairs(n)
                .filter(|p| thresholds.accepts(&acq[p.master], &acq[p.slave]))
                .collect()
        }
    }
}

fn skip_pairs(n: usize, skip: usize) -> Vec<Pair> {
    let mut pairs = Vec::new();
    for i in 0..n {
        for j in (i + 1)..=i.saturating_add(skip).min(n.saturating_sub(1)) {
            pairs.push(Pair::new(i, j));
        }
    }
    pairs
}

fn all_pairs(n: usize) -> impl Iterator<Item = Pair> {
    (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| Pair::new(i, j)))
}

fn year_to_year_pairs(catalog: &Catalog, tolerance_days: u32) -> Vec<Pair> {
    let acq = &catalog.acquisitions;
    all_pairs(acq.len())
        .filter(|p| {
            let (a, b) = (&acq[p.master], &acq[p.slave]);
            a.date.year() != b.date.year() && day_of_year_distance(a.day_of_year(), b.day_of_year()) <= tolerance_days
        })
        .collect()
}

/// Circular distance between two days of year, so Dec 20 and Jan 5 are 16 days apart.
fn day_of_year_distance(a: u32, b: u32) -> u32 {
    let d = a.abs_diff(b);
    d.min(DAYS_PER_YEAR.abs_diff(d))
}

/// Filter candidates by the thresholds, then sort and dedup.
fn apply_thresholds(policy: SelectionPolicy, candidates: Vec<Pair>, catalog: &Catalog, thresholds: &Thresholds) -> PolicyPairs {
    let acq = &catalog.acquisitions;
    let mut dropped = 0;
    let mut kept = Vec::with_capacity(candidates.len());

    for pair in candidates {
        if pair.master == pair.slave {
            continue;
        }
        if thresholds.accepts(&acq[pair.master], &acq[pair.slave]) {
            kept.push(pair);
        } else {
            log::debug!(
                "{policy}: dropping {}_{} (dB={:.1} m, dt={:.0} d)",
                acq[pair.master].date_token(),
                acq[pair.slave].date_token(),
                (acq[pair.master].spatial_baseline - acq[pair.slave].spatial_baseline).abs(),
                (acq[pair.master].temporal_baseline - acq[pair.slave].temporal_baseline).abs(),
            );
            dropped += 1;
        }
    }

    PolicyPairs {
        policy,
        pairs: union(catalog, std::iter::once(kept.as_slice())),
        dropped,
    }
}

/// Merge pair lists, keeping the first orientation seen for each unordered pair,
/// sorted by (master date, slave date).
///
/// A reference-star pair mastered on a later reference can therefore appear
/// reversed in the superset when an earlier policy already contributed it;
/// `intf.in.ref` keeps the reference as master.
fn union<'a>(catalog: &Catalog, lists: impl Iterator<Item = &'a [Pair]>) -> Vec<Pair> {
    let mut seen = BTreeSet::new();
    let mut out: Vec<Pair> = lists
        .flatten()
        .copied()
        .filter(|p| seen.insert(p.unordered_key()))
        .collect();
    sort_pairs(&mut out, catalog);
    out
}

/// Sort by (master date, slave date). Dates are unique, so this is total.
pub fn sort_pairs(pairs: &mut [Pair], catalog: &Catalog) {
    let acq = &catalog.acquisitions;
    pairs.sort_by_key(|p| (acq[p.master].date, acq[p.slave].date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Acquisition;
    use crate::network::test_support::{catalog_from, dates_of, random_catalog, scenario_catalog};
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config(policies: Vec<SelectionPolicy>, thresholds: Thresholds) -> SelectionConfig {
        SelectionConfig {
            policies,
            thresholds,
            ..SelectionConfig::default()
        }
    }

    #[test]
    fn sequential_scenario() {
        let catalog = scenario_catalog();
        let net = select_pairs(&catalog, &config(vec![SelectionPolicy::Sequential], Thresholds::default()));
        assert_eq!(
            dates_of(&catalog, &net.superset),
            vec!["20150126_20150607", "20150607_20150701", "20150701_20150725"]
        );
    }

    #[test]
    fn reference_star_scenario() {
        let catalog = scenario_catalog();
        let net = select_pairs(&catalog, &config(vec![SelectionPolicy::Reference], Thresholds::default()));
        assert_eq!(
            dates_of(&catalog, &net.superset),
            vec!["20150126_20150607", "20150126_20150701", "20150126_20150725"]
        );
    }

    #[test]
    fn reference_star_masters_on_reference_even_when_later() {
        let mut catalog = scenario_catalog();
        catalog.reference = 2;
        let pairs = topology(&SelectionPolicy::Reference, &catalog, &Thresholds::default());
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|p| p.master == 2));
        let net = select_pairs(&catalog, &config(vec![SelectionPolicy::Reference], Thresholds::default()));
        assert_eq!(
            dates_of(&catalog, &net.superset),
            vec!["20150701_20150126", "20150701_20150607", "20150701_20150725"]
        );
    }

    #[test]
    fn skip_two_over_four_dates() {
        let catalog = scenario_catalog();
        let pairs = topology(&SelectionPolicy::Skip { n: 2 }, &catalog, &Thresholds::default());
        let got: Vec<(usize, usize)> = pairs.iter().map(|p| (p.master, p.slave)).collect();
        assert_eq!(got, vec![(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn skip_larger_than_stack_is_all_pairs() {
        let catalog = scenario_catalog();
        assert_eq!(topology(&SelectionPolicy::Skip { n: 10 }, &catalog, &Thresholds::default()).len(), 6);
    }

    #[test]
    fn huge_skip_distance_saturates_to_all_pairs() {
        let catalog = scenario_catalog();
        let skip = crate::io::prm::parse_selection_config("SKIP = 18446744073709551615\n", std::path::Path::new("t.PRM"))
            .unwrap();
        let net = select_pairs(&catalog, &skip);
        assert_eq!(
            dates_of(&catalog, &net.superset),
            vec![
                "20150126_20150607",
                "20150126_20150701",
                "20150126_20150725",
                "20150607_20150701",
                "20150607_20150725",
                "20150701_20150725",
            ]
        );
    }

    #[test]
    fn thresholds_filter_topological_policies() {
        let catalog = scenario_catalog();
        let thresholds = Thresholds {
            max_spatial: Some(20.0),
            ..Thresholds::default()
        };
        let net = select_pairs(&catalog, &config(vec![SelectionPolicy::Sequential], thresholds));
        // 0126->0607 is 40 m and 0607->0701 is 50 m apart.
        assert_eq!(dates_of(&catalog, &net.superset), vec!["20150701_20150725"]);
        assert_eq!(net.per_policy[0].dropped, 2);
    }

    #[test]
    fn threshold_policy_enumerates_all_admissible_pairs() {
        let catalog = scenario_catalog();
        let thresholds = Thresholds {
            max_spatial: Some(35.0),
            min_temporal: Some(20.0),
            max_temporal: Some(160.0),
        };
        let net = select_pairs(&catalog, &config(vec![SelectionPolicy::Threshold], thresholds));
        assert_eq!(
            dates_of(&catalog, &net.superset),
            vec!["20150126_20150701", "20150607_20150725", "20150701_20150725"]
        );
        assert_eq!(net.per_policy[0].dropped, 0);
    }

    #[test]
    fn year_to_year_needs_a_different_year() {
        let catalog = catalog_from(&[
            ("20150126", 0.0),
            ("20150607", 1.0),
            ("20151230", 2.0),
            ("20160105", 3.0),
            ("20160620", 4.0),
            ("20170101", 5.0),
        ]);
        let pairs = topology(
            &SelectionPolicy::YearToYear { tolerance_days: 30 },
            &catalog,
            &Thresholds::default(),
        );
        assert_eq!(
            dates_of(&catalog, &pairs),
            vec![
                "20150126_20160105",
                "20150126_20170101",
                "20150607_20160620",
                "20151230_20160105",
                "20151230_20170101",
                "20160105_20170101",
            ]
        );
    }

    #[test]
    fn year_to_year_tolerance_is_inclusive_and_wraps_the_year_end() {
        let y2y = |rows: &[(&str, f64)]| {
            let catalog = catalog_from(rows);
            let pairs = topology(
                &SelectionPolicy::YearToYear { tolerance_days: 30 },
                &catalog,
                &Thresholds::default(),
            );
            dates_of(&catalog, &pairs)
        };

        // Day 1 against day 31 and day 32.
        assert_eq!(y2y(&[("20150101", 0.0), ("20160131", 1.0)]), vec!["20150101_20160131"]);
        assert!(y2y(&[("20150101", 0.0), ("20160201", 1.0)]).is_empty());

        // Across the year boundary.
        assert_eq!(y2y(&[("20151220", 0.0), ("20160105", 1.0)]), vec!["20151220_20160105"]);
        assert_eq!(y2y(&[("20151202", 0.0), ("20170101", 1.0)]), vec!["20151202_20170101"]);
        assert!(y2y(&[("20151201", 0.0), ("20170101", 1.0)]).is_empty());
    }

    #[test]
    fn empty_year_to_year_is_not_an_error() {
        let catalog = scenario_catalog();
        let net = select_pairs(
            &catalog,
            &config(
                vec![SelectionPolicy::Sequential, SelectionPolicy::YearToYear { tolerance_days: 30 }],
                Thresholds::default(),
            ),
        );
        assert!(net.per_policy[1].pairs.is_empty());
        assert_eq!(net.superset.len(), 3);
    }

    #[test]
    fn superset_merges_overlapping_policies() {
        let catalog = scenario_catalog();
        let net = select_pairs(
            &catalog,
            &config(
                vec![SelectionPolicy::Sequential, SelectionPolicy::Skip { n: 2 }, SelectionPolicy::Reference],
                Thresholds::default(),
            ),
        );
        assert_eq!(net.per_policy[0].pairs.len(), 3);
        assert_eq!(net.per_policy[1].pairs.len(), 5);
        assert_eq!(net.per_policy[2].pairs.len(), 3);
        // Union: the five skip-2 pairs plus (0126, 0725).
        assert_eq!(net.superset.len(), 6);
    }

    #[test]
    fn superset_keeps_one_orientation_of_a_pair() {
        let mut catalog = scenario_catalog();
        catalog.reference = 1;
        let net = select_pairs(
            &catalog,
            &config(vec![SelectionPolicy::Sequential, SelectionPolicy::Reference], Thresholds::default()),
        );
        // Sequential contributes (0126, 0607); the star's (0607, 0126) is the same pair.
        assert_eq!(
            dates_of(&catalog, &net.superset),
            vec!["20150126_20150607", "20150607_20150701", "20150607_20150725", "20150701_20150725"]
        );
        assert_eq!(
            dates_of(&catalog, &net.per_policy[1].pairs),
            vec!["20150607_20150126", "20150607_20150701", "20150607_20150725"]
        );
    }

    #[test]
    fn randomized_invariants_hold() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..25 {
            let catalog = random_catalog(&mut rng, 40);
            let thresholds = Thresholds {
                max_spatial: Some(120.0),
                min_temporal: None,
                max_temporal: Some(400.0),
            };
            let policies = vec![
                SelectionPolicy::Sequential,
                SelectionPolicy::Skip { n: 1 },
                SelectionPolicy::Skip { n: 3 },
                SelectionPolicy::YearToYear { tolerance_days: 30 },
                SelectionPolicy::Long { window_start: 150, window_end: 270 },
                SelectionPolicy::Threshold,
            ];
            let net = select_pairs(&catalog, &config(policies, thresholds));
            let acq: &[Acquisition] = &catalog.acquisitions;

            let seq = &net.per_policy[0].pairs;
            assert_eq!(seq, &net.per_policy[1].pairs, "sequential must equal skip-1");
            assert!(seq.iter().all(|p| net.per_policy[2].pairs.contains(p)), "sequential within skip-3");

            for set in net.per_policy.iter().map(|p| &p.pairs).chain(std::iter::once(&net.superset)) {
                let mut keys = BTreeSet::new();
                for p in set {
                    assert_ne!(acq[p.master].date, acq[p.slave].date);
                    assert!(keys.insert(p.unordered_key()), "duplicate pair");
                    assert!((acq[p.master].spatial_baseline - acq[p.slave].spatial_baseline).abs() <= 120.0);
                    assert!((acq[p.master].temporal_baseline - acq[p.slave].temporal_baseline).abs() <= 400.0);
                }
                let keys: Vec<(NaiveDate, NaiveDate)> =
                    set.iter().map(|p| (acq[p.master].date, acq[p.slave].date)).collect();
                assert!(keys.windows(2).all(|w| w[0] < w[1]), "ordering");
            }
        }
    }

    #[test]
    fn selection_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(11);
        let catalog = random_catalog(&mut rng, 30);
        let cfg = config(
            vec![SelectionPolicy::Skip { n: 2 }, SelectionPolicy::YearToYear { tolerance_days: 45 }],
            Thresholds::default(),
        );
        assert_eq!(select_pairs(&catalog, &cfg), select_pairs(&catalog, &cfg));
    }
}
