use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// A calendar month, ordered by calendar time. Canonical text form is `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonthParseError {
    #[error("expected YYYY-MM, got {0:?}")]
    Format(String),
    #[error("month out of range in {0:?}")]
    Month(String),
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing today's UTC date.
    pub fn current() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Shift by `delta` months; negative values move into the past.
    pub fn add_months(self, delta: i64) -> Self {
        let index = self.index().saturating_add(delta);
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Number of months from `self` to `later`; negative when `later` is earlier.
    pub fn months_until(self, later: MonthKey) -> i64 {
        later.index() - self.index()
    }

    /// Short display label such as `Sep 2025`.
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|date| date.format("%b %Y").to_string())
            .unwrap_or_else(|| self.to_string())
    }

    fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| MonthParseError::Format(s.to_string()))?;
        if year.len() != 4 || month.len() != 2 {
            return Err(MonthParseError::Format(s.to_string()));
        }
        let year: i32 = year
            .parse()
            .map_err(|_| MonthParseError::Format(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| MonthParseError::Format(s.to_string()))?;
        MonthKey::new(year, month).ok_or_else(|| MonthParseError::Month(s.to_string()))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
