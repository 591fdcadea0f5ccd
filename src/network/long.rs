//! Long-pair chain.
//!
//! Builds a chain of roughly yearly pairs from the first to the last
//! acquisition, hopping through a fixed day-of-year window (typically the
//! snow-free season) so every link connects scenes with similar surface
//! conditions:
//!
//! - the first window is in the first scene's year if the scene precedes the
//!   window start, otherwise in the following year
//! - in each year, the next link is the later in-window scene with the smallest
//!   perpendicular-baseline difference to the current scene (ties: earliest)
//! - years without an in-window scene are skipped
//! - if the chain stops short of the last acquisition, a final link closes it

use chrono::Datelike;

use crate::domain::{Catalog, Pair};

pub fn long_chain(catalog: &Catalog, window_start: u32, window_end: u32) -> Vec<Pair> {
    let acq = &catalog.acquisitions;
    let n = acq.len();
    if n < 2 {
        return Vec::new();
    }
    let last = n - 1;
    let last_year = acq[last].date.year();
    let window = window_start..=window_end;

    let first = &acq[0];
    let mut year = if first.day_of_year() < window_start {
        first.date.year()
    } else {
        first.date.year() + 1
    };

    let mut pairs = Vec::new();
    let mut current = 0;

    while year <= last_year && current < last {
        let from = acq[current].spatial_baseline;
        let next = ((current + 1)..n)
            .filter(|&k| acq[k].date.year() == year && window.contains(&acq[k].day_of_year()))
            .min_by(|&a, &b| {
                let da = (acq[a].spatial_baseline - from).abs();
                let db = (acq[b].spatial_baseline - from).abs();
                da.total_cmp(&db)
            });

        if let Some(next) = next {
            pairs.push(Pair::new(current, next));
            current = next;
        }
        year += 1;
    }

    if current != last {
        pairs.push(Pair::new(current, last));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::test_support::{catalog_from, dates_of};

    #[test]
    fn chain_hops_through_windows_and_closes_on_last_scene() {
        let catalog = catalog_from(&[
            ("20150126", 0.0),
            ("20150607", 40.0),
            ("20150701", -10.0),
            ("20150725", 5.0),
            ("20160301", 20.0),
            ("20160615", -30.0),
            ("20160801", 12.0),
            ("20170201", 0.0),
        ]);
        let pairs = long_chain(&catalog, 150, 270);
        assert_eq!(
            dates_of(&catalog, &pairs),
            vec!["20150126_20150725", "20150725_20160801", "20160801_20170201"]
        );
    }

    #[test]
    fn first_scene_inside_window_starts_next_year() {
        let catalog = catalog_from(&[
            ("20150607", 0.0),
            ("20150701", 1.0),
            ("20160610", 50.0),
            ("20160620", 3.0),
            ("20170701", 2.0),
        ]);
        let pairs = long_chain(&catalog, 150, 270);
        assert_eq!(
            dates_of(&catalog, &pairs),
            vec!["20150607_20160620", "20160620_20170701"]
        );
    }

    #[test]
    fn no_window_scene_links_first_to_last() {
        let catalog = catalog_from(&[("20150110", 0.0), ("20150120", 1.0), ("20160115", 2.0)]);
        let pairs = long_chain(&catalog, 150, 270);
        assert_eq!(dates_of(&catalog, &pairs), vec!["20150110_20160115"]);
    }

    #[test]
    fn single_scene_has_no_chain() {
        let catalog = catalog_from(&[("20150110", 0.0)]);
        assert!(long_chain(&catalog, 150, 270).is_empty());
    }
}
