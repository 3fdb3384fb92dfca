//! Common error types for BookMinder

use thiserror::Error;

use crate::book::BookId;

/// Common result type for BookMinder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across BookMinder crates
#[derive(Error, Debug)]
pub enum Error {
    /// Date text that is not a valid `YYYY-MM-DD` calendar date
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    /// No book with this id in the session's collection
    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    /// One or more user-facing validation messages
    #[error("Validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed TOML configuration file
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
