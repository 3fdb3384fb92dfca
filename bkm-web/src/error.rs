//! Error types for bkm-web
//!
//! Handler failures render as a small HTML page with a 4xx/5xx status
//! instead of aborting the request.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use bkm_common::BookId;
use thiserror::Error;
use tracing::{error, warn};

use crate::views;

/// Main error type for bkm-web handlers
#[derive(Error, Debug)]
pub enum WebError {
    /// No book with this id in the caller's session
    #[error("Book {0} was not found.")]
    NotFound(BookId),

    /// Malformed request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<bkm_common::Error> for WebError {
    fn from(err: bkm_common::Error) -> Self {
        match err {
            bkm_common::Error::BookNotFound(id) => WebError::NotFound(id),
            bkm_common::Error::InvalidDate(_) | bkm_common::Error::Validation(_) => {
                WebError::BadRequest(err.to_string())
            }
            other => WebError::Internal(other.to_string()),
        }
    }
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        (status, Html(views::error_page(status, &self.to_string()))).into_response()
    }
}

/// Convenience Result type for handlers
pub type Result<T> = std::result::Result<T, WebError>;
