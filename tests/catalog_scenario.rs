use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDate, Utc};

use poker_event_engine::aggregation::{
    SeriesFacetTracker, available_dates, filtered_and_sorted, grouped_by_series,
};
use poker_event_engine::api::StaticSource;
use poker_event_engine::buyin::{BuyinRange, parse_buyin};
use poker_event_engine::cache::{EventCatalogCache, FileStore};
use poker_event_engine::clock::ManualClock;
use poker_event_engine::config::CacheSettings;
use poker_event_engine::domain::{CalendarDate, EventRecord, FilterSelection};
use poker_event_engine::services::{CatalogOrigin, CatalogService};
use poker_event_engine::timing::{EventStatus, EventStatusResolver};

const D1: CalendarDate = CalendarDate {
    year: 2024,
    month: 6,
    day: 14,
};
const D2: CalendarDate = CalendarDate {
    year: 2024,
    month: 6,
    day: 15,
};

fn scenario_catalog() -> Vec<EventRecord> {
    vec![
        EventRecord::new("A", "Opening Event", D1)
            .with_series("WSOP")
            .with_buyin_text("$500"),
        EventRecord::new("B", "Freeroll", D1)
            .with_series("WSOP")
            .with_buyin_text("$0"),
        EventRecord::new("C", "Nightly Deepstack", D2).with_buyin_text("$1,000+$100"),
    ]
}

fn ids(events: &[&EventRecord]) -> Vec<String> {
    events.iter().map(|event| event.id.clone()).collect()
}

#[test]
fn test_filtered_and_sorted_scenario() {
    let catalog = scenario_catalog();
    let selection = FilterSelection::new()
        .with_buyin_range(BuyinRange::UpTo500)
        .with_active_date(D1);

    assert_eq!(ids(&filtered_and_sorted(&catalog, &selection)), vec!["A"]);
    assert_eq!(available_dates(&catalog), vec![D1, D2]);
}

#[test]
fn test_grouped_by_series_scenario() {
    let catalog = scenario_catalog();
    let groups = grouped_by_series(&catalog, &FilterSelection::new());

    assert_eq!(groups.sorted_series_names, vec!["WSOP", "Other Events"]);
    assert_eq!(ids(groups.get("WSOP").unwrap()), vec!["A", "B"]);
    assert_eq!(ids(groups.get("Other Events").unwrap()), vec!["C"]);
}

#[test]
fn test_buyin_expressions() {
    assert_eq!(parse_buyin("$100"), Some(100.0));
    assert_eq!(parse_buyin("$50+$20"), Some(70.0));
    assert_eq!(parse_buyin("$100-$20"), Some(80.0));
    assert_eq!(parse_buyin("free"), None);
    assert_eq!(parse_buyin("$0"), None);
    assert_eq!(parse_buyin("$10+bogus"), Some(10.0));
    assert_eq!(parse_buyin("$1,000+$100"), Some(1100.0));
}

#[test]
fn test_status_across_an_evening() {
    let resolver = EventStatusResolver::default();
    let date = CalendarDate::new(2024, 6, 14);
    let at = |hour: u32, minute: u32| {
        NaiveDate::from_ymd_opt(2024, 6, 14)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    };

    let resolve = |now| resolver.resolve(date, Some("7:00 PM"), Some("Level 4"), Some(20), now);

    assert_eq!(resolve(at(18, 0)), EventStatus::Upcoming);
    assert_eq!(resolve(at(19, 30)), EventStatus::LateRegistration);
    assert_eq!(resolve(at(20, 20)), EventStatus::Active);
    assert_eq!(resolve(at(23, 59)), EventStatus::Active);
    assert_eq!(resolve(at(20, 20) + Duration::hours(12)), EventStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_sync_then_browse_from_file_cache() {
    let temp_dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let store = Arc::new(FileStore::new(temp_dir.path()).unwrap());
    let cache = EventCatalogCache::new(store, clock.clone(), CacheSettings::default());
    let service = CatalogService::new(cache, SeriesFacetTracker::new(StdDuration::from_millis(300)));

    let catalog = scenario_catalog();
    let mut source = StaticSource::new([catalog[..2].to_vec(), catalog[1..].to_vec()]);
    let load = service.load(&mut source, false).await.unwrap();

    assert_eq!(
        load.origin,
        CatalogOrigin::Fetched {
            batches: 2,
            duplicates: 1
        }
    );
    assert_eq!(load.facet.names().collect::<Vec<_>>(), vec!["WSOP"]);

    let reopened = EventCatalogCache::new(
        Arc::new(FileStore::new(temp_dir.path()).unwrap()),
        clock.clone(),
        CacheSettings::default(),
    );
    let cached = reopened.read().unwrap();
    assert_eq!(cached, catalog);

    let first_day = filtered_and_sorted(&cached, &FilterSelection::new());
    assert_eq!(ids(&first_day), vec!["A", "B"]);

    clock.advance(Duration::hours(6) + Duration::seconds(1));
    assert!(reopened.read().is_none());
}
