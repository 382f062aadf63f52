pub mod aggregation;
pub mod api;
pub mod buyin;
pub mod cache;
pub mod cli;
pub mod clock;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod http;
pub mod pagination;
pub mod services;
pub mod timing;

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::aggregation::{available_dates, filtered_and_sorted, grouped_by_series};
use crate::api::{CatalogClient, StaticSource};
use crate::buyin::{BuyinRange, classify_buyin};
use crate::cli::Command;
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::domain::{CalendarDate, FilterSelection};
use crate::errors::with_parse_context;
use crate::services::{CatalogLoad, CatalogService, report};
use crate::timing::EventStatusResolver;

const NOW_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_status(
    date: CalendarDate,
    start: Option<&str>,
    late_reg: Option<&str>,
    level_length: Option<u32>,
    now: Option<&str>,
) -> Result<()> {
    let config = AppConfig::from_env();
    let resolver = EventStatusResolver::new(config.timing);
    let now = match now {
        Some(text) => parse_local_time(text)?,
        None => SystemClock.local_now(),
    };

    let timeline = resolver.timeline(date, start, late_reg, level_length);
    report::print_timeline(&timeline, timeline.status_at(now), now);
    Ok(())
}

pub fn handle_buyin(text: &str) -> Result<()> {
    report::print_buyin(text, classify_buyin(text));
    Ok(())
}

pub fn handle_sync(force: bool, from_file: Option<&Path>) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let load = load_catalog(&AppConfig::from_env(), force, from_file).await?;
        report::print_load_summary(&load);
        Ok(())
    })
}

pub fn handle_browse(series: &[String], buyin: BuyinRange, date: Option<CalendarDate>) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let load = load_catalog(&config, false, None).await?;

        let mut selection = FilterSelection::new().with_series(series.iter().cloned()).with_buyin_range(buyin);
        if let Some(date) = date {
            selection = selection.with_active_date(date);
        }

        let resolver = EventStatusResolver::new(config.timing);
        let events = filtered_and_sorted(&load.events, &selection);
        let dates = available_dates(&load.events);
        report::print_browse(&events, &dates, &selection, &resolver, SystemClock.local_now());
        Ok(())
    })
}

pub fn handle_series(buyin: BuyinRange) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let load = load_catalog(&AppConfig::from_env(), false, None).await?;
        let selection = FilterSelection::new().with_buyin_range(buyin);

        let groups = grouped_by_series(&load.events, &selection);
        report::print_series(&groups, &load.facet);
        Ok(())
    })
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}

async fn load_catalog(config: &AppConfig, force: bool, from_file: Option<&Path>) -> Result<CatalogLoad> {
    let service = CatalogService::from_config(config, Arc::new(SystemClock))?;

    match from_file {
        Some(path) => {
            let mut source = StaticSource::from_json_file(path)?;
            service.load(&mut source, force).await
        }
        None => {
            let mut client = CatalogClient::new(&config.fetch)?;
            service.load(&mut client, force).await
        }
    }
}

fn parse_local_time(text: &str) -> Result<NaiveDateTime> {
    let trimmed = text.trim();
    let parsed = NaiveDateTime::parse_from_str(trimmed, NOW_FORMATS[0])
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, NOW_FORMATS[1]));
    with_parse_context(parsed, "--now timestamp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_local_time_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap().and_hms_opt(19, 30, 0).unwrap();
        assert_eq!(parse_local_time("2024-07-01T19:30:00").unwrap(), expected);
        assert_eq!(parse_local_time(" 2024-07-01T19:30 ").unwrap(), expected);

        let error = parse_local_time("tonight").unwrap_err();
        assert!(error.to_string().contains("--now timestamp"));
    }
}
