use log::warn;
use serde_json::Value;

use super::models::RawEventDocument;
use crate::domain::EventRecord;

/// Check if API response has more pages
pub fn has_more_pages(data: &Value) -> bool {
    extract_has_more(data).unwrap_or(false)
}

fn extract_has_more(data: &Value) -> Option<bool> {
    data.get("pagination")?.get("has_more")?.as_bool()
}

/// Records from one page, skipping documents that do not fit the schema
pub fn parse_event_page(data: &Value) -> Vec<EventRecord> {
    let Some(documents) = data.get("events").and_then(Value::as_array) else {
        warn!("Catalog page has no events array");
        return Vec::new();
    };

    documents
        .iter()
        .filter_map(|document| match serde_json::from_value::<RawEventDocument>(document.clone()) {
            Ok(raw) => raw.into_record(),
            Err(e) => {
                warn!("Skipping malformed event document: {}", e);
                None
            }
        })
        .collect()
}
