use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::debug;

use super::late_registration::{LateRegistrationCue, extract_cue};
use super::time_of_day::parse_time_of_day;
use crate::config::TimingSettings;

/// Turns free-text start and late registration descriptions into instants.
///
/// Instants are local wall-clock times; the catalog does not carry zones.
#[derive(Debug, Clone, Default)]
pub struct TimeHeuristicParser {
    settings: TimingSettings,
}

impl TimeHeuristicParser {
    pub fn new(settings: TimingSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TimingSettings {
        &self.settings
    }

    /// Start time on `base_date`, or the default start when the text is
    /// missing or matches none of the time-of-day formats.
    pub fn resolve_start_instant(&self, base_date: NaiveDate, start_time_text: Option<&str>) -> NaiveDateTime {
        let time = start_time_text
            .and_then(parse_time_of_day)
            .unwrap_or(self.settings.default_start);
        base_date.and_time(time)
    }

    /// When late registration closes, or `None` if there is no late
    /// registration text at all.
    pub fn resolve_late_registration_end(
        &self,
        start: NaiveDateTime,
        late_registration_text: Option<&str>,
        level_length_minutes: Option<u32>,
    ) -> Option<NaiveDateTime> {
        let text = late_registration_text
            .map(str::trim)
            .filter(|text| !text.is_empty())?;

        let end = match extract_cue(text) {
            Some(LateRegistrationCue::Levels(count)) => {
                let level_length = self.level_length(level_length_minutes);
                i64::from(count)
                    .checked_mul(i64::from(level_length))
                    .and_then(|minutes| offset_minutes(start, minutes))
            }
            Some(LateRegistrationCue::Duration(duration)) => start.checked_add_signed(duration),
            Some(LateRegistrationCue::ClockTime(time)) => Some(start.date().and_time(time)),
            None => None,
        };

        Some(end.unwrap_or_else(|| {
            debug!("No usable late registration cue in '{}', using fallback", text);
            saturating_add(start, self.settings.late_registration_fallback)
        }))
    }

    fn level_length(&self, level_length_minutes: Option<u32>) -> u32 {
        level_length_minutes
            .filter(|minutes| *minutes > 0)
            .unwrap_or(self.settings.default_level_length_minutes)
    }
}

fn offset_minutes(start: NaiveDateTime, minutes: i64) -> Option<NaiveDateTime> {
    Duration::try_minutes(minutes).and_then(|offset| start.checked_add_signed(offset))
}

/// `at + delta`, pinned to `NaiveDateTime::MAX` instead of overflowing.
pub(crate) fn saturating_add(at: NaiveDateTime, delta: Duration) -> NaiveDateTime {
    at.checked_add_signed(delta).unwrap_or(NaiveDateTime::MAX)
}
