use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A `(year, month, day)` triple as written in the catalog.
///
/// Ordering is lexicographic over the fields, which is calendar order for
/// well-formed dates. Parsing only checks that the fields are numeric, so a
/// value may name a day that does not exist; [`CalendarDate::to_naive_date`]
/// clamps it onto a real one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month(), date.day())
    }

    /// Month clamped into 1..=12, day clamped into the month's length.
    pub fn to_naive_date(&self) -> NaiveDate {
        let month = self.month.clamp(1, 12);
        let day = self.day.clamp(1, days_in_month(self.year, month));
        NaiveDate::from_ymd_opt(self.year, month, day).unwrap_or(NaiveDate::MIN)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    (28..=31)
        .rev()
        .find(|day| NaiveDate::from_ymd_opt(year, month, *day).is_some())
        .unwrap_or(28)
}

fn parse_field<T: FromStr>(field: &str) -> Option<T> {
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

impl FromStr for CalendarDate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.trim().split('-').collect();
        let [year, month, day] = fields.as_slice() else {
            bail!("Expected YYYY-MM-DD, got: {}", s);
        };

        match (parse_field(year), parse_field(month), parse_field(day)) {
            (Some(year), Some(month), Some(day)) => Ok(Self::new(year, month, day)),
            _ => bail!("Non-numeric date field in: {}", s),
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_well_formed() {
        for text in ["2024-03-05", "1999-12-31", "2026-01-01", "0042-07-09"] {
            let date: CalendarDate = text.parse().unwrap();
            assert_eq!(date.to_string(), text);
        }
    }

    #[test]
    fn test_ordering_matches_tuple_ordering() {
        let dates = [
            CalendarDate::new(2024, 3, 5),
            CalendarDate::new(2024, 3, 6),
            CalendarDate::new(2024, 4, 1),
            CalendarDate::new(2023, 12, 31),
            CalendarDate::new(2025, 1, 1),
        ];

        for a in &dates {
            for b in &dates {
                assert_eq!(
                    a.cmp(b),
                    (a.year, a.month, a.day).cmp(&(b.year, b.month, b.day)),
                    "{a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn test_invalid_strings_fail() {
        for text in ["", "2024-03", "2024/03/05", "2024-03-05-01", "2024-ab-05", "2024-+3-05", "today"] {
            assert!(text.parse::<CalendarDate>().is_err(), "{text} should not parse");
        }
    }

    #[test]
    fn test_out_of_range_fields_parse_but_clamp() {
        let date: CalendarDate = "2024-13-45".parse().unwrap();
        assert_eq!(date, CalendarDate::new(2024, 13, 45));
        assert_eq!(date.to_naive_date(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        let leap = CalendarDate::new(2024, 2, 30).to_naive_date();
        assert_eq!(leap, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_serde_uses_iso_string() {
        let date = CalendarDate::new(2024, 3, 5);
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2024-03-05\"");

        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
        assert!(serde_json::from_str::<CalendarDate>("\"March 5\"").is_err());
    }
}
