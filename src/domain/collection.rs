use std::collections::HashMap;

use super::models::EventRecord;

/// Catalog under construction, de-duplicated by event id.
///
/// Keeps first-seen order; a later record with a known id replaces the
/// earlier one in place.
pub struct EventCollection {
    events: Vec<EventRecord>,
    positions: HashMap<String, usize>,
}

impl EventCollection {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Returns `true` when the id was not seen before.
    pub fn add(&mut self, record: EventRecord) -> bool {
        match self.positions.get(&record.id) {
            Some(&index) => {
                self.events[index] = record;
                false
            }
            None => {
                self.positions.insert(record.id.clone(), self.events.len());
                self.events.push(record);
                true
            }
        }
    }

    /// Returns how many records were new.
    pub fn extend<I: IntoIterator<Item = EventRecord>>(&mut self, records: I) -> usize {
        let mut added = 0;
        for record in records {
            if self.add(record) {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&EventRecord> {
        self.positions.get(id).map(|&index| &self.events[index])
    }

    pub fn as_slice(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn into_vec(self) -> Vec<EventRecord> {
        self.events
    }
}

impl Default for EventCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<EventRecord> for EventCollection {
    fn from_iter<I: IntoIterator<Item = EventRecord>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CalendarDate;

    fn record(id: &str, name: &str) -> EventRecord {
        EventRecord::new(id, name, CalendarDate::new(2024, 6, 1))
    }

    #[test]
    fn test_duplicates_replace_in_place() {
        let mut collection = EventCollection::new();
        assert!(collection.add(record("a", "First")));
        assert!(collection.add(record("b", "Second")));
        assert!(!collection.add(record("a", "First (updated)")));

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get("a").unwrap().name, "First (updated)");

        let ids: Vec<_> = collection.into_vec().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_extend_counts_new_records() {
        let mut collection: EventCollection = vec![record("a", "A")].into_iter().collect();
        let added = collection.extend(vec![record("a", "A2"), record("c", "C"), record("d", "D")]);

        assert_eq!(added, 2);
        assert_eq!(collection.len(), 3);
        assert!(!collection.is_empty());
    }
}
