//! Static asset routes
//!
//! The client script and stylesheet are compiled into the binary.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

const APP_JS: &str = include_str!("../ui/application.js");
const APP_CSS: &str = include_str!("../ui/application.css");

/// GET /javascripts/application.js
///
/// Toggles the date inputs from the "not yet" checkboxes
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        APP_JS,
    )
        .into_response()
}

/// GET /stylesheets/application.css
pub async fn serve_app_css() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css")],
        APP_CSS,
    )
        .into_response()
}
