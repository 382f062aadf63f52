use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::{Captures, Regex};

/// Time-of-day layouts accepted in event start and late registration text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDayFormat {
    /// `h:mm a`, e.g. "7:30 PM"
    HourMinuteSpacedMeridiem,
    /// `HH:mm`, e.g. "19:00"
    TwentyFourHour,
    /// `h a`, e.g. "7 PM"
    HourSpacedMeridiem,
    /// `ha`, e.g. "7PM"
    HourMeridiem,
    /// `h:mma`, e.g. "7:30PM"
    HourMinuteMeridiem,
}

/// Priority order; the first format that matches wins.
pub const TIME_OF_DAY_FORMATS: [TimeOfDayFormat; 5] = [
    TimeOfDayFormat::HourMinuteSpacedMeridiem,
    TimeOfDayFormat::TwentyFourHour,
    TimeOfDayFormat::HourSpacedMeridiem,
    TimeOfDayFormat::HourMeridiem,
    TimeOfDayFormat::HourMinuteMeridiem,
];

static HOUR_MINUTE_SPACED_MERIDIEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<hour>\d{1,2}):(?P<minute>\d{2})\s+(?P<meridiem>[ap])\.?m\.?$")
        .expect("valid h:mm a pattern")
});
static TWENTY_FOUR_HOUR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<hour>\d{1,2}):(?P<minute>\d{2})$").expect("valid HH:mm pattern")
});
static HOUR_SPACED_MERIDIEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<hour>\d{1,2})\s+(?P<meridiem>[ap])\.?m\.?$").expect("valid h a pattern")
});
static HOUR_MERIDIEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<hour>\d{1,2})(?P<meridiem>[ap])\.?m\.?$").expect("valid ha pattern")
});
static HOUR_MINUTE_MERIDIEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<hour>\d{1,2}):(?P<minute>\d{2})(?P<meridiem>[ap])\.?m\.?$")
        .expect("valid h:mma pattern")
});

/// Finds candidate time tokens inside longer text ("closes at 9:30 PM").
static TIME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d{1,2}(?::\d{2})?\s*[ap]\.?m\b\.?|\b\d{1,2}:\d{2}\b").expect("valid time token pattern")
});

impl TimeOfDayFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            TimeOfDayFormat::HourMinuteSpacedMeridiem => "h:mm a",
            TimeOfDayFormat::TwentyFourHour => "HH:mm",
            TimeOfDayFormat::HourSpacedMeridiem => "h a",
            TimeOfDayFormat::HourMeridiem => "ha",
            TimeOfDayFormat::HourMinuteMeridiem => "h:mma",
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            TimeOfDayFormat::HourMinuteSpacedMeridiem => &HOUR_MINUTE_SPACED_MERIDIEM,
            TimeOfDayFormat::TwentyFourHour => &TWENTY_FOUR_HOUR,
            TimeOfDayFormat::HourSpacedMeridiem => &HOUR_SPACED_MERIDIEM,
            TimeOfDayFormat::HourMeridiem => &HOUR_MERIDIEM,
            TimeOfDayFormat::HourMinuteMeridiem => &HOUR_MINUTE_MERIDIEM,
        }
    }

    /// Parses the whole (trimmed) text in this format.
    pub fn parse(self, text: &str) -> Option<NaiveTime> {
        let captures = self.regex().captures(text.trim())?;
        time_from_captures(&captures)
    }
}

fn time_from_captures(captures: &Captures) -> Option<NaiveTime> {
    let hour: u32 = captures.name("hour")?.as_str().parse().ok()?;
    let minute: u32 = match captures.name("minute") {
        Some(minute) => minute.as_str().parse().ok()?,
        None => 0,
    };

    let hour = match captures.name("meridiem") {
        Some(meridiem) => to_24_hour(hour, meridiem.as_str())?,
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn to_24_hour(hour: u32, meridiem: &str) -> Option<u32> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    if meridiem.eq_ignore_ascii_case("p") {
        Some(hour % 12 + 12)
    } else {
        Some(hour % 12)
    }
}

/// Tries each format in priority order and reports which one matched.
pub fn match_time_of_day(text: &str) -> Option<(TimeOfDayFormat, NaiveTime)> {
    TIME_OF_DAY_FORMATS
        .iter()
        .find_map(|format| format.parse(text).map(|time| (*format, time)))
}

pub fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    match_time_of_day(text).map(|(_, time)| time)
}

/// First time-like token in free text that parses in one of the formats.
pub fn find_time_of_day(text: &str) -> Option<NaiveTime> {
    TIME_TOKEN
        .find_iter(text)
        .find_map(|token| parse_time_of_day(token.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_priority_order_is_explicit() {
        let patterns: Vec<_> = TIME_OF_DAY_FORMATS.iter().map(|f| f.pattern()).collect();
        assert_eq!(patterns, vec!["h:mm a", "HH:mm", "h a", "ha", "h:mma"]);
    }

    #[test]
    fn test_each_format() {
        let cases = [
            ("7:30 PM", TimeOfDayFormat::HourMinuteSpacedMeridiem, time(19, 30)),
            ("19:00", TimeOfDayFormat::TwentyFourHour, time(19, 0)),
            ("7 pm", TimeOfDayFormat::HourSpacedMeridiem, time(19, 0)),
            ("11AM", TimeOfDayFormat::HourMeridiem, time(11, 0)),
            ("7:30pm", TimeOfDayFormat::HourMinuteMeridiem, time(19, 30)),
        ];

        for (text, format, expected) in cases {
            assert_eq!(match_time_of_day(text), Some((format, expected)), "{text}");
        }
    }

    #[test]
    fn test_noon_and_midnight() {
        assert_eq!(parse_time_of_day("12:00 PM"), Some(time(12, 0)));
        assert_eq!(parse_time_of_day("12 AM"), Some(time(0, 0)));
        assert_eq!(parse_time_of_day("00:15"), Some(time(0, 15)));
        assert_eq!(parse_time_of_day("  9:05 a.m. "), Some(time(9, 5)));
    }

    #[test]
    fn test_rejects_out_of_range_and_garbage() {
        for text in ["", "TBD", "13 PM", "0 AM", "24:00", "7:75 PM", "7:3 PM", "evening"] {
            assert_eq!(parse_time_of_day(text), None, "{text}");
        }
    }

    #[test]
    fn test_find_in_free_text() {
        assert_eq!(find_time_of_day("Registration closes at 9:30 PM sharp"), Some(time(21, 30)));
        assert_eq!(find_time_of_day("until 21:15"), Some(time(21, 15)));
        assert_eq!(find_time_of_day("until 10pm"), Some(time(22, 0)));
        assert_eq!(find_time_of_day("ends 99:99 or 8 p.m."), Some(time(20, 0)));
        assert_eq!(find_time_of_day("no time here"), None);
    }
}
