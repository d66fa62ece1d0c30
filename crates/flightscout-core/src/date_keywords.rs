// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Relative date keywords such as `today`, `next_week` or `friday+1w`.
//!
//! A keyword resolves either to a single instant (`now`, optionally shifted)
//! or to an inclusive UTC range spanning whole days. An optional single offset
//! `[+-]N` followed by a unit shifts both ends:
//!
//! | unit | meaning |
//! |------|---------|
//! | `d`  | days    |
//! | `w`  | weeks   |
//! | `M`  | months  |
//! | `y`  | years   |
//! | `h`  | hours   |
//! | `m`  | minutes |
//! | `s`  | seconds |

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParsedDate {
    Invalid {
        raw: String,
    },
    Point {
        raw: String,
        date: DateTime<Utc>,
        canonical: String,
    },
    Range {
        raw: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        canonical: String,
    },
}

impl ParsedDate {
    pub fn is_valid(&self) -> bool {
        !matches!(self, ParsedDate::Invalid { .. })
    }

    pub fn canonical(&self) -> Option<&str> {
        match self {
            ParsedDate::Invalid { .. } => None,
            ParsedDate::Point { canonical, .. } | ParsedDate::Range { canonical, .. } => {
                Some(canonical)
            }
        }
    }

    /// Inclusive bounds; a point yields the same instant twice.
    pub fn bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self {
            ParsedDate::Invalid { .. } => None,
            ParsedDate::Point { date, .. } => Some((*date, *date)),
            ParsedDate::Range { start, end, .. } => Some((*start, *end)),
        }
    }
}

pub struct DateKeywordParser;

impl DateKeywordParser {
    pub fn parse(input: &str, now: DateTime<Utc>) -> ParsedDate {
        let raw = input.trim().to_string();
        match Self::resolve(&raw, now) {
            Some((start, end)) if start == end => ParsedDate::Point {
                canonical: start.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                date: start,
                raw,
            },
            Some((start, end)) => ParsedDate::Range {
                canonical: format!("{}_{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d")),
                start,
                end,
                raw,
            },
            None => ParsedDate::Invalid { raw },
        }
    }

    fn resolve(raw: &str, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        static KEYWORD_RE: OnceLock<Regex> = OnceLock::new();
        static OFFSET_RE: OnceLock<Regex> = OnceLock::new();

        if raw.is_empty() {
            return None;
        }
        let keyword_re = KEYWORD_RE.get_or_init(|| {
            Regex::new(r"^(?i)([a-z_]+|\d{4}-\d{2}-\d{2})([+-].+)?$").expect("keyword pattern")
        });
        let caps = keyword_re.captures(raw)?;
        let base = caps.get(1)?.as_str().to_lowercase();
        let (start, end) = base_range(&base, now)?;

        let Some(offset) = caps.get(2) else {
            return Some((start, end));
        };
        // Unit is case-sensitive: `M` is months, `m` is minutes.
        let offset_re = OFFSET_RE
            .get_or_init(|| Regex::new(r"^([+-]\d+)([dwMyhms])$").expect("offset pattern"));
        let oc = offset_re.captures(offset.as_str())?;
        let amount: i64 = oc.get(1)?.as_str().parse().ok()?;
        let unit = oc.get(2)?.as_str();
        Some((shift(start, amount, unit)?, shift(end, amount, unit)?))
    }
}

fn base_range(base: &str, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let today = now.date_naive();
    let range = match base {
        "now" => (now, now),
        "today" => day_range(today),
        "tomorrow" => day_range(today + Duration::days(1)),
        "yesterday" => day_range(today - Duration::days(1)),
        "this_week" => week_range(week_start(today)),
        "next_week" => week_range(week_start(today) + Duration::weeks(1)),
        "last_week" => week_range(week_start(today) - Duration::weeks(1)),
        "this_month" => month_range(month_start(today))?,
        "next_month" => month_range(month_start(today).checked_add_months(Months::new(1))?)?,
        "last_month" => month_range(month_start(today).checked_sub_months(Months::new(1))?)?,
        "this_year" => year_range(today.year())?,
        "next_year" => year_range(today.year() + 1)?,
        other => {
            if let Some(target) = weekday(other) {
                let delta = (7 + target.num_days_from_monday() as i64
                    - today.weekday().num_days_from_monday() as i64)
                    % 7;
                day_range(today + Duration::days(delta))
            } else {
                let date = NaiveDate::parse_from_str(other, "%Y-%m-%d").ok()?;
                day_range(date)
            }
        }
    };
    Some(range)
}

fn shift(t: DateTime<Utc>, amount: i64, unit: &str) -> Option<DateTime<Utc>> {
    match unit {
        "d" => t.checked_add_signed(Duration::try_days(amount)?),
        "w" => t.checked_add_signed(Duration::try_weeks(amount)?),
        "M" => add_months(t, amount),
        "y" => add_months(t, amount.checked_mul(12)?),
        "h" => t.checked_add_signed(Duration::try_hours(amount)?),
        "m" => t.checked_add_signed(Duration::try_minutes(amount)?),
        "s" => t.checked_add_signed(Duration::try_seconds(amount)?),
        _ => None,
    }
}

/// Calendar month arithmetic, clamping to the last day of shorter months.
fn add_months(t: DateTime<Utc>, amount: i64) -> Option<DateTime<Utc>> {
    let months = Months::new(u32::try_from(amount.unsigned_abs()).ok()?);
    if amount >= 0 {
        t.checked_add_months(months)
    } else {
        t.checked_sub_months(months)
    }
}

fn weekday(name: &str) -> Option<Weekday> {
    match name {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn start_of(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn end_of(date: NaiveDate) -> DateTime<Utc> {
    start_of(date) + Duration::days(1) - Duration::milliseconds(1)
}

fn day_range(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    (start_of(date), end_of(date))
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_range(monday: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    (start_of(monday), end_of(monday + Duration::days(6)))
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn month_range(first: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((start_of(first), end_of(last)))
}

fn year_range(year: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
    Some((start_of(first), end_of(last)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Wednesday
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 14, 15, 30, 0).unwrap()
    }

    fn canonical(input: &str) -> String {
        DateKeywordParser::parse(input, now())
            .canonical()
            .unwrap_or("invalid")
            .to_string()
    }

    #[test]
    fn test_now_is_a_point() {
        let parsed = DateKeywordParser::parse("now", now());
        assert_eq!(
            parsed,
            ParsedDate::Point {
                raw: "now".to_string(),
                date: now(),
                canonical: "2026-01-14T15:30:00Z".to_string(),
            }
        );
        assert_eq!(canonical("now-2h"), "2026-01-14T13:30:00Z");
        assert_eq!(canonical("NOW+90m"), "2026-01-14T17:00:00Z");
    }

    #[test]
    fn test_day_keywords() {
        assert_eq!(canonical("today"), "2026-01-14_2026-01-14");
        assert_eq!(canonical("tomorrow"), "2026-01-15_2026-01-15");
        assert_eq!(canonical("yesterday"), "2026-01-13_2026-01-13");
        assert_eq!(canonical("today+3d"), "2026-01-17_2026-01-17");

        let (start, end) = DateKeywordParser::parse("today", now()).bounds().unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 1, 14, 0, 0, 0).unwrap());
        assert_eq!(end - start, Duration::days(1) - Duration::milliseconds(1));
    }

    #[test]
    fn test_weeks_start_on_monday() {
        assert_eq!(canonical("this_week"), "2026-01-12_2026-01-18");
        assert_eq!(canonical("next_week"), "2026-01-19_2026-01-25");
        assert_eq!(canonical("last_week"), "2026-01-05_2026-01-11");
    }

    #[test]
    fn test_months_and_years() {
        assert_eq!(canonical("this_month"), "2026-01-01_2026-01-31");
        assert_eq!(canonical("next_month"), "2026-02-01_2026-02-28");
        assert_eq!(canonical("last_month"), "2025-12-01_2025-12-31");
        assert_eq!(canonical("this_year"), "2026-01-01_2026-12-31");
        assert_eq!(canonical("next_year"), "2027-01-01_2027-12-31");
        assert_eq!(canonical("2026-01-31+1M"), "2026-02-28_2026-02-28");
        assert_eq!(canonical("today+1y"), "2027-01-14_2027-01-14");
    }

    #[test]
    fn test_weekday_is_next_occurrence_including_today() {
        assert_eq!(canonical("wednesday"), "2026-01-14_2026-01-14");
        assert_eq!(canonical("friday"), "2026-01-16_2026-01-16");
        assert_eq!(canonical("monday"), "2026-01-19_2026-01-19");
        assert_eq!(canonical("Friday+1w"), "2026-01-23_2026-01-23");
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(canonical("2026-03-05"), "2026-03-05_2026-03-05");
        assert_eq!(canonical("2026-02-30"), "invalid");
    }

    #[test]
    fn test_invalid_inputs() {
        for input in ["", "   ", "someday", "today+3", "today+3x", "today+1d+2d", "12:00"] {
            let parsed = DateKeywordParser::parse(input, now());
            assert!(!parsed.is_valid(), "{input:?} should be invalid");
        }
        assert_eq!(
            DateKeywordParser::parse("  bogus ", now()),
            ParsedDate::Invalid {
                raw: "bogus".to_string()
            }
        );
    }

    #[test]
    fn test_out_of_range_offsets_are_invalid() {
        for input in [
            "today+99999999999999d",
            "now-99999999999999w",
            "now+9999999999999999h",
            "today+99999999999M",
        ] {
            assert!(!DateKeywordParser::parse(input, now()).is_valid(), "{input:?}");
        }
    }
}
