//! Timestamp conversion.
//!
//! SQLite has no timestamp type, so every API timestamp is stored as integer
//! epoch seconds. The API emits naive ISO-8601 strings, sometimes with a
//! fractional part and sometimes without; both are read as UTC.

use chrono::NaiveDateTime;

use crate::{Error, Result};

/// `%.f` also matches an absent fraction, so this one format covers both
/// spellings.
const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Convert an API timestamp string to whole epoch seconds.
pub fn string_to_epoch(input: &str) -> Result<i64> {
  NaiveDateTime::parse_from_str(input, FORMAT)
    .map(|dt| dt.and_utc().timestamp())
    .map_err(|_| Error::DateParse { input: input.to_owned() })
}
