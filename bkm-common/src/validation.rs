//! Add/edit form validation
//!
//! Every rule runs on every submission and contributes at most one message,
//! so the user sees all problems at once. Messages are ordered: start date,
//! completion date, title, author.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::parse_date;
use crate::{Error, Result};

/// Inclusive character-length bounds for title and author
pub const MIN_TEXT_LEN: usize = 1;
pub const MAX_TEXT_LEN: usize = 70;

/// Raw add/edit form submission
///
/// Browsers omit disabled inputs, so every field defaults to empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BookForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub date_started: String,
    #[serde(default)]
    pub date_completed: String,
}

/// A validated submission, ready to become or overwrite a `Book`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub date_started: Option<NaiveDate>,
    pub date_completed: Option<NaiveDate>,
}

pub fn error_for_start_date(start: Option<NaiveDate>, today: NaiveDate) -> Option<String> {
    match start {
        Some(date) if date > today => {
            Some("Date started must be today's date or earlier.".to_string())
        }
        _ => None,
    }
}

/// Completion date rules; ordering against the start date wins over the future check
pub fn error_for_complete_date(
    completed: Option<NaiveDate>,
    started: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<String> {
    let completed = completed?;
    match started {
        Some(started) if completed < started => {
            Some("Date completed must be after date started.".to_string())
        }
        _ if completed > today => {
            Some("Date completed must be today's date or earlier.".to_string())
        }
        None => Some("Date started is required when a date completed is given.".to_string()),
        Some(_) => None,
    }
}

fn text_len_ok(text: &str) -> bool {
    (MIN_TEXT_LEN..=MAX_TEXT_LEN).contains(&text.chars().count())
}

/// Expects an already-trimmed title
pub fn error_for_title(title: &str) -> Option<String> {
    if title.is_empty() {
        Some("You must enter a title.".to_string())
    } else if !text_len_ok(title) {
        Some("Title must be between 1 and 70 characters.".to_string())
    } else {
        None
    }
}

/// Expects an already-trimmed author
pub fn error_for_author(author: &str) -> Option<String> {
    if author.is_empty() {
        Some("You must enter an author.".to_string())
    } else if !text_len_ok(author) {
        Some("Author's name must be between 1 and 70 characters.".to_string())
    } else {
        None
    }
}

impl BookForm {
    /// Validate against `today`, returning every message on failure
    pub fn validate(&self, today: NaiveDate) -> Result<BookDraft> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        let author = self.author.trim();

        let date_started = match parse_date(&self.date_started) {
            Ok(date) => date,
            Err(_) => {
                errors.push("Date started must be a valid date (YYYY-MM-DD).".to_string());
                None
            }
        };
        let start_invalid = !errors.is_empty();

        let date_completed = match parse_date(&self.date_completed) {
            Ok(date) => date,
            Err(_) => {
                errors.push("Date completed must be a valid date (YYYY-MM-DD).".to_string());
                None
            }
        };

        errors.extend(error_for_start_date(date_started, today));
        if !start_invalid {
            errors.extend(error_for_complete_date(date_completed, date_started, today));
        }
        errors.extend(error_for_title(title));
        errors.extend(error_for_author(author));

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        Ok(BookDraft {
            title: title.to_string(),
            author: author.to_string(),
            date_started,
            date_completed,
        })
    }
}
