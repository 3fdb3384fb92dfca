//! # BookMinder Common Library
//!
//! Domain code shared by the BookMinder service:
//! - Book records and shelf classification
//! - Date parsing and display formatting
//! - Form validation rules
//! - The per-session reading context (`ReadingSession`)
//! - Bootstrap configuration loading

pub mod book;
pub mod config;
pub mod dates;
pub mod error;
pub mod session;
pub mod validation;

pub use book::{next_id, Book, BookId, Shelf};
pub use error::{Error, Result};
pub use session::{Flash, ReadingSession};
pub use validation::{BookDraft, BookForm};
