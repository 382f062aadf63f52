use log::warn;
use serde::Deserialize;

use crate::domain::{CalendarDate, EventRecord};

/// Event document as served by the catalog backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventDocument {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub series_name: Option<String>,
    pub date: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub late_reg: Option<String>,
    #[serde(default)]
    pub level_length: Option<u32>,
    #[serde(default)]
    pub buy_in: Option<String>,
    #[serde(default)]
    pub buy_in_amount: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
}

impl RawEventDocument {
    /// Converts to a record, or `None` when the date is unusable.
    pub fn into_record(self) -> Option<EventRecord> {
        let scheduled_date = match self.date.trim().parse::<CalendarDate>() {
            Ok(date) => date,
            Err(e) => {
                warn!("Skipping event {} with bad date '{}': {}", self.id, self.date, e);
                return None;
            }
        };

        Some(EventRecord {
            id: self.id,
            name: self.name,
            scheduled_date,
            start_time_text: non_blank(self.start_time),
            late_registration_text: non_blank(self.late_reg),
            level_length_minutes: self.level_length,
            series_name: non_blank(self.series_name),
            buyin_text: non_blank(self.buy_in),
            buyin_amount: self.buy_in_amount.filter(|amount| amount.is_finite()),
            image_ref: non_blank(self.image_url),
            venue: non_blank(self.venue),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
