//! Test utilities and helper functions for rule tests
//!
//! This module provides common setup functions so tests can pin the clock
//! and build posts relative to it.

use crate::ast::ParsedRule;
use crate::parser::{parse_with, ParseOptions};
use crate::post::Post;
use chrono::{DateTime, Duration, Months, TimeZone, Utc};

/// A fixed reference instant: 2021-06-15 12:00:00 UTC
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 6, 15, 12, 0, 0).unwrap()
}

/// Parse a rule with ages counted back from [`fixed_now`]
pub fn rule_at_fixed_now(input: &str) -> ParsedRule {
    parse_with(input, ParseOptions::at(fixed_now()))
        .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", input, e))
}

/// Create a post created at [`fixed_now`] with the given text
pub fn post_with_text(text: &str) -> Post {
    Post::new(1, fixed_now(), text)
}

/// Create a post created `months` and `days` before [`fixed_now`]
pub fn post_aged(months: u32, days: i64) -> Post {
    let created_at = fixed_now()
        .checked_sub_months(Months::new(months))
        .unwrap()
        - Duration::days(days);
    Post::new(1, created_at, "")
}

/// Create a post created at midnight UTC on the given day
pub fn post_created_on(year: i32, month: u32, day: u32) -> Post {
    Post::new(1, Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap(), "")
}
