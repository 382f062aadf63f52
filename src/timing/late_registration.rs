use std::sync::LazyLock;

use chrono::{Duration, NaiveTime};
use regex::Regex;

use super::time_of_day::find_time_of_day;

/// What a late registration description tells us about when it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LateRegistrationCue {
    /// Closes after this many blind levels.
    Levels(u32),
    /// Closes this long after the start.
    Duration(Duration),
    /// Closes at this time of day, on the start's calendar day.
    ClockTime(NaiveTime),
}

pub type CueExtractor = fn(&str) -> Option<LateRegistrationCue>;

/// Priority order; only the first extractor that finds a cue is used.
pub const LATE_REGISTRATION_EXTRACTORS: [(&str, CueExtractor); 3] = [
    ("level count", extract_level_count),
    ("duration", extract_duration),
    ("clock time", extract_clock_time),
];

static LEVEL_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"(?i)\b(?:end\s+of\s+)?level\s*(?P<count>\d{1,4})\b",
        r"(?i)\b(?P<count>\d{1,4})\s+levels\b",
        r"(?i)\bthrough\s+level\s*(?P<count>\d{1,4})\b",
    ]
    .map(|pattern| Regex::new(pattern).expect("valid level pattern"))
});

static HOURS_AND_MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?P<hours>\d{1,3})\s*h\s*(?P<minutes>\d{1,4})\s*m(?:in(?:ute)?s?)?\b")
        .expect("valid Hh Mm pattern")
});
static HOURS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?P<hours>\d{1,3}(?:\.\d+)?)\s*(?:hours?|hrs?|h)\b").expect("valid hours pattern")
});
static MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?P<minutes>\d{1,4})\s*(?:minutes?|mins?|m)\b").expect("valid minutes pattern")
});

/// Runs the extractors in priority order. Blank text has no cue.
pub fn extract_cue(text: &str) -> Option<LateRegistrationCue> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    LATE_REGISTRATION_EXTRACTORS
        .iter()
        .find_map(|(_, extract)| extract(text))
}

pub fn extract_level_count(text: &str) -> Option<LateRegistrationCue> {
    LEVEL_PATTERNS.iter().find_map(|pattern| {
        let count = pattern.captures(text)?.name("count")?.as_str().parse().ok()?;
        Some(LateRegistrationCue::Levels(count))
    })
}

pub fn extract_duration(text: &str) -> Option<LateRegistrationCue> {
    if let Some(captures) = HOURS_AND_MINUTES.captures(text) {
        let hours: i64 = captures.name("hours")?.as_str().parse().ok()?;
        let minutes: i64 = captures.name("minutes")?.as_str().parse().ok()?;
        return Some(LateRegistrationCue::Duration(Duration::minutes(hours * 60 + minutes)));
    }

    let hour_minutes = HOURS
        .captures(text)
        .and_then(|captures| captures.name("hours")?.as_str().parse::<f64>().ok())
        .map(|hours| (hours * 60.0).trunc() as i64);
    let minutes = MINUTES
        .captures(text)
        .and_then(|captures| captures.name("minutes")?.as_str().parse::<i64>().ok());

    match (hour_minutes, minutes) {
        (None, None) => None,
        (hours, minutes) => {
            let total = hours.unwrap_or(0) + minutes.unwrap_or(0);
            Some(LateRegistrationCue::Duration(Duration::minutes(total)))
        }
    }
}

pub fn extract_clock_time(text: &str) -> Option<LateRegistrationCue> {
    find_time_of_day(text).map(LateRegistrationCue::ClockTime)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(total: i64) -> Option<LateRegistrationCue> {
        Some(LateRegistrationCue::Duration(Duration::minutes(total)))
    }

    #[test]
    fn test_extractor_order() {
        let names: Vec<_> = LATE_REGISTRATION_EXTRACTORS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["level count", "duration", "clock time"]);
    }

    #[test]
    fn test_level_phrases() {
        assert_eq!(extract_cue("Level 8"), Some(LateRegistrationCue::Levels(8)));
        assert_eq!(extract_cue("end of level 12"), Some(LateRegistrationCue::Levels(12)));
        assert_eq!(extract_cue("Through Level 6"), Some(LateRegistrationCue::Levels(6)));
        assert_eq!(extract_cue("first 9 levels"), Some(LateRegistrationCue::Levels(9)));
        assert_eq!(extract_cue("LEVEL10"), Some(LateRegistrationCue::Levels(10)));
    }

    #[test]
    fn test_first_level_mention_wins() {
        assert_eq!(extract_cue("Level 6 through level 8"), Some(LateRegistrationCue::Levels(6)));
        assert_eq!(extract_cue("12 levels, through level 14"), Some(LateRegistrationCue::Levels(14)));
    }

    #[test]
    fn test_duration_phrases() {
        assert_eq!(extract_cue("2 hours"), minutes(120));
        assert_eq!(extract_cue("1.5 hours"), minutes(90));
        assert_eq!(extract_cue("1.33 hrs"), minutes(79));
        assert_eq!(extract_cue("90 mins"), minutes(90));
        assert_eq!(extract_cue("45 minutes"), minutes(45));
        assert_eq!(extract_cue("1h 30m"), minutes(90));
        assert_eq!(extract_cue("2h"), minutes(120));
        assert_eq!(extract_cue("2 hours 15 minutes"), minutes(135));
    }

    #[test]
    fn test_clock_time_phrases() {
        let cue = extract_cue("Closes at 9:30 PM");
        assert_eq!(cue, Some(LateRegistrationCue::ClockTime(NaiveTime::from_hms_opt(21, 30, 0).unwrap())));

        let cue = extract_cue("until 23:00");
        assert_eq!(cue, Some(LateRegistrationCue::ClockTime(NaiveTime::from_hms_opt(23, 0, 0).unwrap())));
    }

    #[test]
    fn test_priority_over_best_match() {
        // A level cue wins even when a duration and a clock time are present.
        assert_eq!(
            extract_cue("Level 6 (about 2 hours, until 9 PM)"),
            Some(LateRegistrationCue::Levels(6))
        );
        // A duration wins over a clock time.
        assert_eq!(extract_cue("2 hours, until 9:30 PM"), minutes(120));
    }

    #[test]
    fn test_no_cue() {
        assert_eq!(extract_cue(""), None);
        assert_eq!(extract_cue("   "), None);
        assert_eq!(extract_cue("Yes"), None);
        assert_eq!(extract_cue("Ask the floor"), None);
    }
}
