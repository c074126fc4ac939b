//! Date/time extraction: combined tokens, split-line pairing, month gating.
//!
//! Receipts print the timestamp either as one combined token
//! (`22:25 - 22/09/2025`, `22/09/2025 22:25`) or as separate time and date
//! fragments that OCR scatters over neighboring lines. A candidate is only
//! accepted when its month lands in [1, 12]; the day digit is left alone
//! unless strict checking is configured.

use chrono::{DateTime, Datelike, FixedOffset, Utc};

use crate::error::ConfigError;
use crate::models::config::DateTimeConfig;
use crate::models::{DateTimeField, FieldId};

use super::super::locate;
use super::patterns::{self, DateTimePatterns};
use super::{Candidate, LineView, Scope, Strategy};

/// A parsed and validated date/time candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDateTime {
    /// Canonical display form, `HH:MM[:SS]-DD/MM/YYYY`.
    pub display: String,
    pub month: u32,
    pub year: i32,
}

impl From<ParsedDateTime> for Candidate {
    fn from(parsed: ParsedDateTime) -> Self {
        Candidate::DateTime {
            raw: parsed.display,
            month: parsed.month,
            year: parsed.year,
        }
    }
}

/// Compiled date/time patterns plus validation strictness.
#[derive(Debug, Clone)]
pub struct DateTimeRules {
    patterns: DateTimePatterns,
    strict_day: bool,
}

impl DateTimeRules {
    pub fn from_config(config: &DateTimeConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            patterns: patterns::datetime_patterns(
                &config.time_separators,
                &config.date_separators,
            )?,
            strict_day: config.strict_day,
        })
    }

    /// Parse the first combined token out of arbitrary text.
    pub fn parse_combined(&self, text: &str) -> Option<ParsedDateTime> {
        let lower = text.to_lowercase();
        let caps = self.patterns.combined.captures(&lower)?;
        let time_text = caps.name("t1").or_else(|| caps.name("t2"))?.as_str();
        let date_text = caps.name("d1").or_else(|| caps.name("d2"))?.as_str();

        let time = self.parse_time(time_text)?;
        let date = self.parse_date(date_text)?;
        Some(compose(time, date))
    }

    fn parse_time(&self, text: &str) -> Option<TimeParts> {
        let caps = self.patterns.time.captures(text)?;
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        let second = match caps.get(3) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };
        Some(TimeParts {
            hour,
            minute,
            second,
        })
    }

    /// A month outside [1, 12] rejects the whole candidate; the day is only
    /// checked under `strict_day`.
    fn parse_date(&self, text: &str) -> Option<DateParts> {
        let caps = self.patterns.date.captures(text)?;
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year = expand_year(caps[3].parse().ok()?);

        if !(1..=12).contains(&month) {
            return None;
        }
        if self.strict_day && !(1..=31).contains(&day) {
            return None;
        }
        Some(DateParts { day, month, year })
    }
}

#[derive(Debug, Clone, Copy)]
struct TimeParts {
    hour: u32,
    minute: u32,
    second: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
struct DateParts {
    day: u32,
    month: u32,
    year: i32,
}

fn compose(time: TimeParts, date: DateParts) -> ParsedDateTime {
    let time_part = match time.second {
        Some(s) => format!("{:02}:{:02}:{:02}", time.hour, time.minute, s),
        None => format!("{:02}:{:02}", time.hour, time.minute),
    };
    ParsedDateTime {
        display: format!(
            "{time_part}-{:02}/{:02}/{:04}",
            date.day, date.month, date.year
        ),
        month: date.month,
        year: date.year,
    }
}

/// Expand a two-digit year: 00–50 into the 2000s, 51–99 into the 1900s.
fn expand_year(year: i32) -> i32 {
    if year < 100 {
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

/// Label-located value parsed as a combined token.
#[derive(Debug, Clone)]
pub struct LabeledDateTime {
    rules: DateTimeRules,
}

impl LabeledDateTime {
    pub fn new(rules: DateTimeRules) -> Self {
        Self { rules }
    }
}

impl Strategy for LabeledDateTime {
    fn run(&self, view: &LineView<'_>) -> Option<Candidate> {
        for (i, key) in view.keys.iter().enumerate() {
            if view.table.match_key(key) != Some(FieldId::DateTime) {
                continue;
            }
            let Some(located) = locate::locate_value(view.lines, i, FieldId::DateTime, view.table)
            else {
                continue;
            };
            if let Some(parsed) = self.rules.parse_combined(&located.raw) {
                return Some(parsed.into());
            }
        }
        None
    }
}

/// Bare combined token, per line or across the whole joined text.
#[derive(Debug, Clone)]
pub struct CombinedDateTime {
    rules: DateTimeRules,
    scope: Scope,
}

impl CombinedDateTime {
    pub fn new(rules: DateTimeRules, scope: Scope) -> Self {
        Self { rules, scope }
    }
}

impl Strategy for CombinedDateTime {
    fn run(&self, view: &LineView<'_>) -> Option<Candidate> {
        match self.scope {
            Scope::Line => view
                .keys
                .iter()
                .find_map(|key| self.rules.parse_combined(key))
                .map(Candidate::from),
            Scope::FullText => self.rules.parse_combined(view.joined).map(Candidate::from),
        }
    }
}

/// Pair independent time and date tokens across lines: minimize the line
/// index distance, break ties toward the earliest date line.
#[derive(Debug, Clone)]
pub struct SplitDateTime {
    rules: DateTimeRules,
}

impl SplitDateTime {
    pub fn new(rules: DateTimeRules) -> Self {
        Self { rules }
    }
}

impl Strategy for SplitDateTime {
    fn run(&self, view: &LineView<'_>) -> Option<Candidate> {
        let mut times: Vec<(usize, TimeParts)> = Vec::new();
        let mut dates: Vec<(usize, DateParts)> = Vec::new();

        for (i, key) in view.keys.iter().enumerate() {
            if let Some(time) = self.rules.parse_time(key) {
                times.push((i, time));
            }
            if let Some(date) = self.rules.parse_date(key) {
                dates.push((i, date));
            }
        }

        let best = times
            .iter()
            .flat_map(|&(ti, time)| {
                dates
                    .iter()
                    .map(move |&(di, date)| (ti.abs_diff(di), di, ti, time, date))
            })
            .min_by_key(|&(diff, di, ti, _, _)| (diff, di, ti))?;

        let (_, _, _, time, date) = best;
        Some(compose(time, date).into())
    }
}

/// Vietnam civil time is UTC+7 with no daylight saving.
pub fn vn_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&FixedOffset::east_opt(7 * 3600).unwrap())
}

/// Month and year of the current Vietnam civil date.
pub fn current_month_vn() -> (u32, i32) {
    let now = vn_now();
    (now.month(), now.year())
}

/// True when the extracted field falls in the current Vietnam month.
pub fn is_current_month_vn(field: &DateTimeField) -> bool {
    let (month, year) = current_month_vn();
    field.is_in_month(month, year)
}
