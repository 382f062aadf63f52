use chrono::NaiveDateTime;
use colored::{ColoredString, Colorize};

use crate::aggregation::{SeriesFacet, SeriesGroups};
use crate::buyin::{BuyinClass, effective_buyin};
use crate::domain::{CalendarDate, EventRecord, FilterSelection};
use crate::services::catalog::{CatalogLoad, CatalogOrigin};
use crate::timing::{EventStatus, EventStatusResolver, EventTimeline};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn status_badge(status: EventStatus) -> ColoredString {
    let badge = format!("[{}]", status.label());
    match status {
        EventStatus::Upcoming => badge.blue(),
        EventStatus::LateRegistration => badge.yellow().bold(),
        EventStatus::Active => badge.green().bold(),
        EventStatus::Completed => badge.dimmed(),
    }
}

pub fn format_amount(amount: Option<f64>) -> String {
    match amount {
        Some(amount) if amount.fract() == 0.0 => format!("${:.0}", amount),
        Some(amount) => format!("${:.2}", amount),
        None => "-".to_string(),
    }
}

pub fn format_event_line(event: &EventRecord, status: EventStatus) -> String {
    let mut line = format!(
        "{} {} {}",
        status_badge(status),
        event.name.bold(),
        format_amount(effective_buyin(event)).cyan()
    );
    if let Some(series) = event.series() {
        line.push_str(&format!(" ({})", series));
    }
    if let Some(venue) = event.venue.as_deref() {
        line.push_str(&format!(" @ {}", venue));
    }
    line
}

pub fn print_timeline(timeline: &EventTimeline, status: EventStatus, now: NaiveDateTime) {
    println!("{} at {}", status_badge(status), now.format(TIMESTAMP_FORMAT));
    println!("  start:             {}", timeline.start.format(TIMESTAMP_FORMAT));
    match timeline.late_registration_end {
        Some(end) => println!("  late reg closes:   {}", end.format(TIMESTAMP_FORMAT)),
        None => println!("  late reg closes:   {}", "unknown".dimmed()),
    }
    println!("  considered over:   {}", timeline.ongoing_end.format(TIMESTAMP_FORMAT));
}

pub fn print_buyin(text: &str, class: BuyinClass) {
    let reading = match class {
        BuyinClass::Priced(amount) => format_amount(Some(amount)).green().bold(),
        BuyinClass::Free => "free".yellow(),
        BuyinClass::Unknown => "unknown".red(),
    };
    println!("{:?} -> {}", text, reading);
}

pub fn print_load_summary(load: &CatalogLoad) {
    match load.origin {
        CatalogOrigin::Cache => println!("{} {} events from cache", "✓".green(), load.events.len()),
        CatalogOrigin::Fetched { batches, duplicates } => println!(
            "{} fetched {} events in {} batches ({} duplicates dropped)",
            "✓".green(),
            load.events.len(),
            batches,
            duplicates
        ),
    }
}

pub fn print_browse(
    events: &[&EventRecord],
    dates: &[CalendarDate],
    selection: &FilterSelection,
    resolver: &EventStatusResolver,
    now: NaiveDateTime,
) {
    let shown_date = selection.active_date.or_else(|| dates.first().copied());
    let heading = match shown_date {
        Some(date) => format!("Events on {} ({})", date, selection.buyin_range),
        None => "No events".to_string(),
    };
    println!("{}", heading.bold().underline());

    if events.is_empty() {
        println!("  {}", "nothing matches the current filters".dimmed());
    }
    for event in events {
        println!("  {}", format_event_line(event, resolver.resolve_record(event, now)));
    }

    let dates: Vec<String> = dates.iter().map(CalendarDate::to_string).collect();
    println!("\n{} {}", "Available dates:".bold(), dates.join(", "));
}

pub fn print_series(groups: &SeriesGroups<'_>, facet: &SeriesFacet) {
    for (series, events) in groups.iter() {
        println!("{} {}", series.bold(), format!("({})", events.len()).dimmed());
        for event in events {
            println!(
                "  {} {} {}",
                event.scheduled_date,
                event.name,
                format_amount(effective_buyin(event)).cyan()
            );
        }
    }

    let available: Vec<String> = facet
        .series
        .iter()
        .map(|entry| format!("{} ({})", entry.name, entry.count))
        .collect();
    println!("\n{} {}", "Series filter:".bold(), available.join(", "));
}
