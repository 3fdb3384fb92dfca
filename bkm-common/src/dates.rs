//! Calendar date utilities
//!
//! Dates travel through forms as `YYYY-MM-DD` and are displayed as
//! `January 15, 2020`.

use chrono::{Local, NaiveDate};

use crate::{Error, Result};

/// Current local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a form date field
///
/// Empty or whitespace-only input means "no date" and is not an error.
/// Anything else must be three `-`-separated integers forming a real
/// calendar date.
///
/// # Examples
///
/// ```
/// use bkm_common::dates::parse_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_date("").unwrap(), None);
/// assert_eq!(
///     parse_date("2020-01-15").unwrap(),
///     NaiveDate::from_ymd_opt(2020, 1, 15)
/// );
/// assert!(parse_date("2020-13-01").is_err());
/// ```
pub fn parse_date(text: &str) -> Result<Option<NaiveDate>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let invalid = || Error::InvalidDate(text.to_string());

    let parts: Vec<&str> = text.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(invalid());
    };

    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or_else(invalid)
}

/// Long display form, e.g. `January 5, 2020`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Form input value (`YYYY-MM-DD`), empty for no date
pub fn format_input(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
