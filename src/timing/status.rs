use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::parser::{TimeHeuristicParser, saturating_add};
use crate::config::TimingSettings;
use crate::domain::{CalendarDate, EventRecord};

/// Lifecycle phase of an event relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventStatus {
    Upcoming,
    LateRegistration,
    Active,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::LateRegistration => "lateRegistration",
            EventStatus::Active => "active",
            EventStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            EventStatus::Upcoming => "Upcoming",
            EventStatus::LateRegistration => "Late Reg",
            EventStatus::Active => "Live",
            EventStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The instants an event's status is judged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTimeline {
    pub start: NaiveDateTime,
    pub late_registration_end: Option<NaiveDateTime>,
    pub ongoing_end: NaiveDateTime,
}

impl EventTimeline {
    pub fn status_at(&self, now: NaiveDateTime) -> EventStatus {
        if now < self.start {
            return EventStatus::Upcoming;
        }
        if let Some(late_end) = self.late_registration_end
            && now < late_end
        {
            return EventStatus::LateRegistration;
        }
        if now < self.ongoing_end {
            EventStatus::Active
        } else {
            EventStatus::Completed
        }
    }
}

/// Derives an event's phase from its date and free-text timing fields.
///
/// Nothing is stored; every call recomputes against the `now` it is given.
#[derive(Debug, Clone, Default)]
pub struct EventStatusResolver {
    parser: TimeHeuristicParser,
}

impl EventStatusResolver {
    pub fn new(settings: TimingSettings) -> Self {
        Self {
            parser: TimeHeuristicParser::new(settings),
        }
    }

    pub fn parser(&self) -> &TimeHeuristicParser {
        &self.parser
    }

    pub fn timeline(
        &self,
        date: CalendarDate,
        start_time_text: Option<&str>,
        late_registration_text: Option<&str>,
        level_length_minutes: Option<u32>,
    ) -> EventTimeline {
        let start = self.parser.resolve_start_instant(date.to_naive_date(), start_time_text);
        let late_registration_end =
            self.parser
                .resolve_late_registration_end(start, late_registration_text, level_length_minutes);
        let ongoing_end = saturating_add(
            late_registration_end.unwrap_or(start),
            self.parser.settings().ongoing_window,
        );

        EventTimeline {
            start,
            late_registration_end,
            ongoing_end,
        }
    }

    pub fn resolve(
        &self,
        date: CalendarDate,
        start_time_text: Option<&str>,
        late_registration_text: Option<&str>,
        level_length_minutes: Option<u32>,
        now: NaiveDateTime,
    ) -> EventStatus {
        self.timeline(date, start_time_text, late_registration_text, level_length_minutes)
            .status_at(now)
    }

    pub fn record_timeline(&self, record: &EventRecord) -> EventTimeline {
        self.timeline(
            record.scheduled_date,
            record.start_time_text.as_deref(),
            record.late_registration_text.as_deref(),
            record.level_length_minutes,
        )
    }

    pub fn resolve_record(&self, record: &EventRecord, now: NaiveDateTime) -> EventStatus {
        self.record_timeline(record).status_at(now)
    }
}
