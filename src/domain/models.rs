use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::calendar::CalendarDate;
use crate::buyin::BuyinRange;

/// One scheduled tournament or cash game occurrence.
///
/// Records are immutable values; identity is the backend-assigned `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: String,
    pub name: String,
    pub scheduled_date: CalendarDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_registration_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_length_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyin_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyin_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

impl EventRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, scheduled_date: CalendarDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            scheduled_date,
            start_time_text: None,
            late_registration_text: None,
            level_length_minutes: None,
            series_name: None,
            buyin_text: None,
            buyin_amount: None,
            image_ref: None,
            venue: None,
        }
    }

    pub fn with_start_time(mut self, text: impl Into<String>) -> Self {
        self.start_time_text = Some(text.into());
        self
    }

    pub fn with_late_registration(mut self, text: impl Into<String>) -> Self {
        self.late_registration_text = Some(text.into());
        self
    }

    pub fn with_level_length(mut self, minutes: u32) -> Self {
        self.level_length_minutes = Some(minutes);
        self
    }

    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series_name = Some(series.into());
        self
    }

    pub fn with_buyin_text(mut self, text: impl Into<String>) -> Self {
        self.buyin_text = Some(text.into());
        self
    }

    /// Non-finite amounts are dropped, since JSON cannot carry them.
    pub fn with_buyin_amount(mut self, amount: f64) -> Self {
        self.buyin_amount = Some(amount).filter(|amount| amount.is_finite());
        self
    }

    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Series name, with blank names treated as missing.
    pub fn series(&self) -> Option<&str> {
        self.series_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

impl PartialEq for EventRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventRecord {}

impl Hash for EventRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Active catalog filters, owned by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub series: BTreeSet<String>,
    pub buyin_range: BuyinRange,
    pub active_date: Option<CalendarDate>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series<I, S>(mut self, series: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.series = series.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_buyin_range(mut self, range: BuyinRange) -> Self {
        self.buyin_range = range;
        self
    }

    pub fn with_active_date(mut self, date: CalendarDate) -> Self {
        self.active_date = Some(date);
        self
    }
}

/// The full catalog as captured at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedCatalogSnapshot {
    pub events: Vec<EventRecord>,
    pub captured_at: DateTime<Utc>,
}

impl CachedCatalogSnapshot {
    pub fn new(events: Vec<EventRecord>, captured_at: DateTime<Utc>) -> Self {
        Self { events, captured_at }
    }

    pub fn is_fresh_at(&self, now: DateTime<Utc>, expiry: Duration) -> bool {
        is_within_expiry(self.captured_at, now, expiry)
    }
}

pub fn is_within_expiry(captured_at: DateTime<Utc>, now: DateTime<Utc>, expiry: Duration) -> bool {
    now.signed_duration_since(captured_at) < expiry
}
