use std::cmp::Ordering;
use std::collections::BTreeSet;

use icu::casemap::CaseMapper;
use icu::collator::options::{CollatorOptions, Strength};
use icu::collator::{Collator, CollatorBorrowed};
use log::warn;

use crate::buyin::effective_buyin;
use crate::domain::{CalendarDate, EventRecord, FilterSelection};

/// Distinct scheduled dates, ascending.
pub fn available_dates(catalog: &[EventRecord]) -> Vec<CalendarDate> {
    catalog
        .iter()
        .map(|event| event.scheduled_date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Events matching every active filter, cheapest first.
///
/// Filters apply in order: series membership, buy-in range, then date. With
/// no active date the earliest date in the catalog is used. Events without a
/// positive buy-in sort after all priced ones.
pub fn filtered_and_sorted<'a>(catalog: &'a [EventRecord], selection: &FilterSelection) -> Vec<&'a EventRecord> {
    let Some(date) = selection.active_date.or_else(|| earliest_date(catalog)) else {
        return Vec::new();
    };

    let mut keyed: Vec<(Option<f64>, &EventRecord)> = catalog
        .iter()
        .filter(|event| matches_series(event, &selection.series))
        .filter_map(|event| {
            let amount = effective_buyin(event);
            selection.buyin_range.contains(amount).then_some((amount, event))
        })
        .filter(|(_, event)| event.scheduled_date == date)
        .collect();

    let names = NameOrder::new();
    keyed.sort_by(|(amount_a, a), (amount_b, b)| {
        compare_amounts(*amount_a, *amount_b)
            .then_with(|| names.compare(&a.name, &b.name))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    keyed.into_iter().map(|(_, event)| event).collect()
}

/// Display-name ordering that ignores case and keeps accented letters
/// next to their base letter.
enum NameOrder {
    Collated(CollatorBorrowed<'static>),
    Folded,
}

impl NameOrder {
    fn new() -> Self {
        let mut options = CollatorOptions::default();
        options.strength = Some(Strength::Secondary);
        match Collator::try_new(Default::default(), options) {
            Ok(collator) => NameOrder::Collated(collator),
            Err(e) => {
                warn!("Collation data unavailable, ordering names by case folding: {}", e);
                NameOrder::Folded
            }
        }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            NameOrder::Collated(collator) => collator.compare(a, b),
            NameOrder::Folded => fold_name(a).cmp(&fold_name(b)),
        }
    }
}

fn earliest_date(catalog: &[EventRecord]) -> Option<CalendarDate> {
    catalog.iter().map(|event| event.scheduled_date).min()
}

fn matches_series(event: &EventRecord, selected: &BTreeSet<String>) -> bool {
    if selected.is_empty() {
        return true;
    }
    event.series().is_some_and(|series| selected.contains(series))
}

fn compare_amounts(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn fold_name(name: &str) -> String {
    CaseMapper::new().fold_string(name).into_owned()
}
