//! Age and date literal conversion
//!
//! Age literals such as `3m5d` describe a span of time counted back from a
//! reference instant. Date literals use the fixed `DD-Mon-YYYY` layout.

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Layout accepted for `created` literals, e.g. `10-May-2020`
pub const DATE_LAYOUT: &str = "%d-%b-%Y";

static AGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:([0-9]+)y)?(?:([0-9]+)m)?(?:([0-9]+)d)?$").unwrap());

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgeError {
    #[error("Invalid age string: {0}")]
    InvalidAge(String),

    #[error("Age out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid date (expected DD-Mon-YYYY): {0}")]
    InvalidDate(String),
}

/// A relative age in years, months and days
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Age {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl Age {
    /// Parse an age literal like `5y3m2d`; every group is optional but at
    /// least one must be present and they must appear in y, m, d order
    pub fn parse(literal: &str) -> Result<Self, AgeError> {
        let caps = AGE_PATTERN
            .captures(literal)
            .ok_or_else(|| AgeError::InvalidAge(literal.to_string()))?;

        if caps.iter().skip(1).all(|group| group.is_none()) {
            return Err(AgeError::InvalidAge(literal.to_string()));
        }

        let group = |idx: usize| -> Result<u32, AgeError> {
            match caps.get(idx) {
                Some(m) => m
                    .as_str()
                    .parse()
                    .map_err(|_| AgeError::OutOfRange(literal.to_string())),
                None => Ok(0),
            }
        };

        Ok(Self {
            years: group(1)?,
            months: group(2)?,
            days: group(3)?,
        })
    }

    /// The instant this age refers to, counted back from `now`.
    ///
    /// Months are subtracted first and clamp to the end of a shorter month
    /// (31-Mar minus 1m is 28/29-Feb), then days.
    pub fn before(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, AgeError> {
        let out_of_range = || AgeError::OutOfRange(self.to_string());

        let total_months = self
            .years
            .checked_mul(12)
            .and_then(|m| m.checked_add(self.months))
            .ok_or_else(out_of_range)?;

        now.checked_sub_months(Months::new(total_months))
            .and_then(|t| t.checked_sub_signed(Duration::days(i64::from(self.days))))
            .ok_or_else(out_of_range)
    }
}

impl std::fmt::Display for Age {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.years > 0 {
            write!(f, "{}y", self.years)?;
        }
        if self.months > 0 {
            write!(f, "{}m", self.months)?;
        }
        if self.days > 0 || (self.years == 0 && self.months == 0) {
            write!(f, "{}d", self.days)?;
        }
        Ok(())
    }
}

/// Convert an age literal into the absolute instant `now - age`
pub fn convert_age_to_time(literal: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, AgeError> {
    Age::parse(literal)?.before(now)
}

/// Parse a `DD-Mon-YYYY` date literal as midnight UTC
pub fn parse_date(literal: &str) -> Result<DateTime<Utc>, AgeError> {
    let date = NaiveDate::parse_from_str(literal, DATE_LAYOUT)
        .map_err(|_| AgeError::InvalidDate(literal.to_string()))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}
