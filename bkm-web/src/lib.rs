//! bkm-web library - BookMinder HTTP service
//!
//! Server-rendered reading tracker: books are bucketed into "currently
//! reading", "read" and "to read" shelves and kept in a per-visitor session.

use axum::Router;
use bkm_common::config::SessionConfig;
use chrono::NaiveDate;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod session;
pub mod views;

use session::SessionStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// All live visitor sessions
    pub sessions: SessionStore,
    /// Source of "today" for date validation and start/finish
    pub today: fn() -> NaiveDate,
}

impl AppState {
    /// Create new application state using the local calendar date
    pub fn new(session_config: &SessionConfig) -> Self {
        Self {
            sessions: SessionStore::new(session_config),
            today: bkm_common::dates::today,
        }
    }

    /// Replace the date source (tests pin "today")
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let books = Router::new()
        .route("/", get(api::list_books))
        .route("/add", get(api::show_add_form).post(api::add_book))
        .route("/edit/:id", get(api::show_edit_form).post(api::edit_book))
        .route("/delete/:id", post(api::delete_book))
        .route("/start/:id", post(api::start_book))
        .route("/finish/:id", post(api::finish_book));

    let assets = Router::new()
        .route("/javascripts/application.js", get(api::serve_app_js))
        .route("/stylesheets/application.css", get(api::serve_app_css))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes());

    Router::new()
        .merge(books)
        .merge(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
