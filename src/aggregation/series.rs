use std::collections::{BTreeSet, HashMap};

use crate::buyin::effective_buyin;
use crate::config::settings::OTHER_EVENTS_LABEL;
use crate::domain::{EventRecord, FilterSelection};

/// Catalog partitioned by series, with a display order for the keys.
#[derive(Debug, Default)]
pub struct SeriesGroups<'a> {
    pub groups: HashMap<String, Vec<&'a EventRecord>>,
    pub sorted_series_names: Vec<String>,
}

impl<'a> SeriesGroups<'a> {
    pub fn get(&self, series: &str) -> Option<&[&'a EventRecord]> {
        self.groups.get(series).map(Vec::as_slice)
    }

    /// Groups in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a EventRecord])> {
        self.sorted_series_names
            .iter()
            .filter_map(|name| self.groups.get(name).map(|events| (name.as_str(), events.as_slice())))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesCount {
    pub name: String,
    pub count: usize,
}

/// Series available for filtering, and the caller's selection pruned to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesFacet {
    pub series: Vec<SeriesCount>,
    pub selected: BTreeSet<String>,
}

impl SeriesFacet {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|entry| entry.name.as_str())
    }
}

/// Groups events by series name, applying only the buy-in filter.
///
/// Events without a series land under "Other Events", which is always the
/// last key. Other keys order by group size, largest first, then by name.
pub fn grouped_by_series<'a>(catalog: &'a [EventRecord], selection: &FilterSelection) -> SeriesGroups<'a> {
    let mut groups: HashMap<String, Vec<&EventRecord>> = HashMap::new();

    for event in catalog {
        if !selection.buyin_range.contains(effective_buyin(event)) {
            continue;
        }
        let key = event.series().unwrap_or(OTHER_EVENTS_LABEL);
        groups.entry(key.to_string()).or_default().push(event);
    }

    let mut sorted_series_names: Vec<String> = groups.keys().cloned().collect();
    sorted_series_names.sort_by(|a, b| {
        let a_other = a == OTHER_EVENTS_LABEL;
        let b_other = b == OTHER_EVENTS_LABEL;
        a_other
            .cmp(&b_other)
            .then_with(|| groups[b].len().cmp(&groups[a].len()))
            .then_with(|| a.cmp(b))
    });

    SeriesGroups {
        groups,
        sorted_series_names,
    }
}

/// Counts named series, most frequent first, and drops selections that no
/// longer exist in the catalog.
pub fn recompute_available_series(catalog: &[EventRecord], selected: &BTreeSet<String>) -> SeriesFacet {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for series in catalog.iter().filter_map(EventRecord::series) {
        *counts.entry(series).or_default() += 1;
    }

    let mut series: Vec<SeriesCount> = counts
        .into_iter()
        .map(|(name, count)| SeriesCount {
            name: name.to_string(),
            count,
        })
        .collect();
    series.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    let selected = selected
        .iter()
        .filter(|name| series.iter().any(|entry| &entry.name == *name))
        .cloned()
        .collect();

    SeriesFacet { series, selected }
}
