use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::core::catalog::RegionCatalog;
use crate::core::raw::RawDailyRecord;
use crate::core::types::{Region, RegionLevel, same_count};

/// Base districts filled from the raw feed, before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRegions {
    pub dates: Vec<String>,
    /// One region per catalog entry, in ascending catalog id order.
    pub regions: Vec<Region>,
    /// Feed entries whose id is not in the catalog.
    pub unknown_entries: usize,
    pub trimmed_trailing_day: bool,
}

/// Maps raw records onto catalog districts and drops a stale trailing day.
#[must_use]
pub fn normalize_regions(records: &[RawDailyRecord], catalog: &RegionCatalog) -> NormalizedRegions {
    let mut slots: BTreeMap<u32, usize> = BTreeMap::new();
    let mut regions = Vec::with_capacity(catalog.len());
    for (id, entry) in catalog.iter() {
        slots.insert(id, regions.len());
        regions.push(Region::shell(
            entry.title.clone(),
            RegionLevel::District,
            entry.population,
        ));
    }

    let mut dates = Vec::with_capacity(records.len());
    let mut unknown_entries = 0usize;
    for record in records {
        dates.push(record.label());
        for entry in &record.entries {
            match slots.get(&entry.region_id) {
                Some(&slot) => regions[slot].push_count(entry.infected),
                None => {
                    unknown_entries += 1;
                    trace!(region_id = entry.region_id, day = %record.day, "ignoring unknown region id");
                }
            }
        }
    }

    let trimmed_trailing_day = trim_trailing_carry(&mut dates, &mut regions);
    debug!(
        days = dates.len(),
        regions = regions.len(),
        unknown_entries,
        trimmed_trailing_day,
        "normalized base regions"
    );

    NormalizedRegions {
        dates,
        regions,
        unknown_entries,
        trimmed_trailing_day,
    }
}

/// Drops the last day when every region repeats its previous value.
///
/// A feed that has not been updated yet carries the previous day forward, so
/// an unchanged final day is treated as incomplete. A genuine zero-growth day
/// across every region is indistinguishable and gets dropped too. Removes at
/// most one day per call.
pub fn trim_trailing_carry(dates: &mut Vec<String>, regions: &mut [Region]) -> bool {
    if dates.is_empty() || regions.is_empty() {
        return false;
    }
    if !regions.iter().all(|region| trailing_pair_repeats(&region.cases)) {
        return false;
    }

    dates.pop();
    for region in regions.iter_mut() {
        region.cases.pop();
    }
    debug!(remaining_days = dates.len(), "dropped unchanged trailing day");
    true
}

/// An absent value compares equal only to another absent value.
fn trailing_pair_repeats(cases: &[f64]) -> bool {
    match cases {
        [] => true,
        [_] => false,
        [.., previous, last] => same_count(*previous, *last),
    }
}
