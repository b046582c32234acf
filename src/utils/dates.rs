// src/utils/dates.rs

//! Parsers for the date and duration strings found on channel pages.
//!
//! Episode rows carry a release date like `2023-01-10` and a running time
//! like `01:02:03`. Both are parsed with explicit `chrono` format strings.

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::error::FeatureError;

/// Format of episode and first-release dates.
pub const EP_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of episode running times.
pub const EP_DURATION_FORMAT: &str = "%H:%M:%S";

/// Seconds in one day, for age arithmetic.
pub const SECONDS_PER_DAY: f64 = 24.0 * 60.0 * 60.0;

/// Parse an episode or release date (`YYYY-MM-DD`).
pub fn parse_ep_date(value: &str) -> Result<NaiveDate, FeatureError> {
    NaiveDate::parse_from_str(value.trim(), EP_DATE_FORMAT).map_err(|source| {
        FeatureError::BadDate {
            value: value.to_string(),
            source,
        }
    })
}

/// Parse an episode running time (`HH:MM:SS`) into seconds.
pub fn parse_duration_secs(value: &str) -> Result<u32, FeatureError> {
    NaiveTime::parse_from_str(value.trim(), EP_DURATION_FORMAT)
        .map(|t| t.num_seconds_from_midnight())
        .map_err(|source| FeatureError::BadDuration {
            value: value.to_string(),
            source,
        })
}

/// Signed number of days from `earlier` to `later`, through seconds.
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> f64 {
    later.signed_duration_since(earlier).num_seconds() as f64 / SECONDS_PER_DAY
}
