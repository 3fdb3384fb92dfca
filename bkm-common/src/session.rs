//! Per-session reading context
//!
//! `ReadingSession` is the whole state of one visitor: their book collection
//! and the one-shot flash messages waiting for the next rendered page. The
//! HTTP layer looks one up per request and hands it to these operations as
//! `&mut`, nothing here is global.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::book::{self, next_id, Book, BookId};
use crate::validation::BookDraft;
use crate::{Error, Result};

/// One-shot status messages, cleared when read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub errors: Vec<String>,
    pub success: Option<String>,
}

impl Flash {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.success.is_none()
    }
}

/// A visitor's books plus pending flash messages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadingSession {
    books: Vec<Book>,
    flash: Flash,
}

impl ReadingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// All books in insertion order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn to_read(&self) -> Vec<&Book> {
        book::to_read(&self.books)
    }

    pub fn currently_reading(&self) -> Vec<&Book> {
        book::currently_reading(&self.books)
    }

    pub fn have_read(&self) -> Vec<&Book> {
        book::have_read(&self.books)
    }

    pub fn find(&self, id: BookId) -> Result<&Book> {
        self.books
            .iter()
            .find(|book| book.id == id)
            .ok_or(Error::BookNotFound(id))
    }

    fn find_mut(&mut self, id: BookId) -> Result<&mut Book> {
        self.books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(Error::BookNotFound(id))
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.flash.success = Some(message.into());
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.flash.errors.push(message.into());
    }

    /// Read and clear pending messages
    pub fn take_flash(&mut self) -> Flash {
        std::mem::take(&mut self.flash)
    }

    /// Append a validated book under a freshly assigned id
    pub fn add(&mut self, draft: BookDraft) -> BookId {
        let id = next_id(&self.books);
        info!(book_id = id, title = %draft.title, "Adding book");

        self.set_success(format!("'{}' successfully added.", draft.title));
        self.books.push(Book {
            id,
            title: draft.title,
            author: draft.author,
            date_started: draft.date_started,
            date_completed: draft.date_completed,
        });
        id
    }

    /// Overwrite an existing book's fields in place; the id never changes
    pub fn update(&mut self, id: BookId, draft: BookDraft) -> Result<()> {
        let book = self.find_mut(id)?;
        book.title = draft.title;
        book.author = draft.author;
        book.date_started = draft.date_started;
        book.date_completed = draft.date_completed;

        info!(book_id = id, title = %book.title, "Updated book");
        let message = format!("'{}' has been updated.", book.title);
        self.set_success(message);
        Ok(())
    }

    /// Remove a book, returning it
    pub fn delete(&mut self, id: BookId) -> Result<Book> {
        let index = self
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or(Error::BookNotFound(id))?;
        let removed = self.books.remove(index);

        info!(book_id = id, title = %removed.title, "Deleted book");
        self.set_success(format!("'{}' has been deleted.", removed.title));
        Ok(removed)
    }

    /// Mark a book started on `today`
    ///
    /// A completed book is left alone with an error flash: restarting it
    /// would put its start date after its completion date.
    pub fn start(&mut self, id: BookId, today: NaiveDate) -> Result<()> {
        let book = self.find_mut(id)?;

        if book.date_completed.is_some() {
            warn!(book_id = id, "Refusing to start a book that has already been read");
            let message = format!("'{}' has already been read.", book.title);
            self.push_error(message);
            return Ok(());
        }

        book.date_started = Some(today);
        info!(book_id = id, %today, "Started book");
        let message = format!("'{}' started today.", book.title);
        self.set_success(message);
        Ok(())
    }

    /// Mark a book completed on `today`, starting it too if it never was
    pub fn finish(&mut self, id: BookId, today: NaiveDate) -> Result<()> {
        let book = self.find_mut(id)?;

        if book.date_started.is_none() {
            book.date_started = Some(today);
        }
        book.date_completed = Some(today);

        info!(book_id = id, %today, "Finished book");
        let message = format!("'{}' completed today.", book.title);
        self.set_success(message);
        Ok(())
    }
}
