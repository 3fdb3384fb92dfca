//! Book records and shelf classification
//!
//! A book's shelf is never stored; it is derived from which of its two
//! dates are present:
//!
//! | `date_started` | `date_completed` | Shelf |
//! |---|---|---|
//! | absent | absent | to read |
//! | present | absent | currently reading |
//! | present | present | have read |
//!
//! A completion date without a start date is rejected by validation and
//! belongs to no shelf.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Session-unique book identifier
pub type BookId = u64;

/// A single tracked book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub date_started: Option<NaiveDate>,
    pub date_completed: Option<NaiveDate>,
}

/// Display category derived from a book's dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shelf {
    ToRead,
    CurrentlyReading,
    HaveRead,
}

impl Book {
    /// Not started and not completed
    pub fn is_to_read(&self) -> bool {
        self.date_started.is_none() && self.date_completed.is_none()
    }

    /// Started but not yet completed
    pub fn is_currently_reading(&self) -> bool {
        self.date_started.is_some() && self.date_completed.is_none()
    }

    /// Started and completed
    pub fn has_been_read(&self) -> bool {
        self.date_started.is_some() && self.date_completed.is_some()
    }

    /// Shelf this book belongs on, `None` for a completed-but-never-started record
    pub fn shelf(&self) -> Option<Shelf> {
        match (self.date_started, self.date_completed) {
            (None, None) => Some(Shelf::ToRead),
            (Some(_), None) => Some(Shelf::CurrentlyReading),
            (Some(_), Some(_)) => Some(Shelf::HaveRead),
            (None, Some(_)) => None,
        }
    }
}

/// Books that have not been started, in collection order
pub fn to_read(books: &[Book]) -> Vec<&Book> {
    books.iter().filter(|book| book.is_to_read()).collect()
}

/// Books started but not completed, in collection order
pub fn currently_reading(books: &[Book]) -> Vec<&Book> {
    books.iter().filter(|book| book.is_currently_reading()).collect()
}

/// Books started and completed, in collection order
pub fn have_read(books: &[Book]) -> Vec<&Book> {
    books.iter().filter(|book| book.has_been_read()).collect()
}

/// Next identifier for a new book: 0 for an empty collection, else max id + 1
pub fn next_id(books: &[Book]) -> BookId {
    books
        .iter()
        .map(|book| book.id)
        .max()
        .map_or(0, |max| max + 1)
}
