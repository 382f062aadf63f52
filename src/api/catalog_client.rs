use std::collections::VecDeque;
use std::future::Future;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{info, warn};
use serde_json::Value;

use super::parsers;
use crate::config::FetchSettings;
use crate::domain::EventRecord;
use crate::errors::{file_context, parse_context, status_context};
use crate::http::ThrottledClient;
use crate::pagination::{PageCursor, PaginationConfig, build_paginated_url};

/// Where catalog batches come from.
///
/// `next_batch` yields `Ok(None)` once the catalog is exhausted.
pub trait CatalogSource {
    fn next_batch(&mut self) -> impl Future<Output = Result<Option<Vec<EventRecord>>>> + Send;
}

/// Paginated catalog client for the events backend
pub struct CatalogClient {
    client: ThrottledClient,
    base_url: String,
    cursor: PageCursor,
    exhausted: bool,
}

impl CatalogClient {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let client = ThrottledClient::new(settings)?;
        let config = match settings.max_pages {
            Some(max) => PaginationConfig::new().with_max_pages(max),
            None => PaginationConfig::new(),
        };

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            cursor: PageCursor::new(config),
            exhausted: false,
        })
    }

    async fn fetch_page(&mut self) -> Result<Value> {
        let url = self.build_events_url();
        info!("Fetching catalog page {} from {}", self.cursor.current_page(), url);

        let response = self.client.get(&url).await?;
        if !response.status().is_success() {
            bail!(status_context(&url, response.status()));
        }

        response
            .json::<Value>()
            .await
            .with_context(|| parse_context("catalog page"))
    }

    // --- Helper Methods ---

    fn build_events_url(&self) -> String {
        let base = format!("{}/events", self.base_url);
        build_paginated_url(&base, self.cursor.current_page())
    }
}

impl CatalogSource for CatalogClient {
    async fn next_batch(&mut self) -> Result<Option<Vec<EventRecord>>> {
        if self.exhausted {
            return Ok(None);
        }
        if self.cursor.has_reached_max() {
            warn!("Stopping after {} pages (page limit reached)", self.cursor.pages_fetched());
            self.exhausted = true;
            return Ok(None);
        }

        let data = self.fetch_page().await?;
        let records = parsers::parse_event_page(&data);

        if !parsers::has_more_pages(&data) {
            self.exhausted = true;
        }
        self.cursor.advance();

        Ok(Some(records))
    }
}

/// Pre-loaded batches, served in order.
#[derive(Debug, Default)]
pub struct StaticSource {
    batches: VecDeque<Vec<EventRecord>>,
}

impl StaticSource {
    pub fn new<I: IntoIterator<Item = Vec<EventRecord>>>(batches: I) -> Self {
        Self {
            batches: batches.into_iter().collect(),
        }
    }

    /// Reads a saved catalog page (`{"events": [...]}`) as a single batch.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| file_context("read", path))?;
        let data: Value = serde_json::from_str(&text).with_context(|| parse_context("catalog file"))?;
        Ok(Self::new([parsers::parse_event_page(&data)]))
    }
}

impl CatalogSource for StaticSource {
    async fn next_batch(&mut self) -> Result<Option<Vec<EventRecord>>> {
        Ok(self.batches.pop_front())
    }
}
