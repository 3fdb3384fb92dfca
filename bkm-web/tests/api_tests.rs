//! Integration tests for bkm-web HTTP endpoints
//!
//! Drives the router with `oneshot`, carrying the session cookie between
//! requests the way a browser would. "Today" is pinned to 2022-06-15.

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use bkm_common::config::SessionConfig;
use bkm_web::{build_router, AppState};
use chrono::NaiveDate;
use tower::util::ServiceExt; // for `oneshot` method

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 6, 15).unwrap()
}

/// Test helper: Create app with default session settings and a pinned date
fn setup_app() -> Router {
    let state = AppState::new(&SessionConfig::default()).with_today(fixed_today);
    build_router(state)
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl TestResponse {
    fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// Test helper: a browser-like client holding one session cookie
struct Client {
    app: Router,
    cookie: Option<String>,
}

impl Client {
    fn new(app: &Router) -> Self {
        Self {
            app: app.clone(),
            cookie: None,
        }
    }

    async fn send(&mut self, method: &str, uri: &str, form: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.as_str());
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                );
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap()
                .to_string();
            self.cookie = Some(pair);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Should read body");
        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).expect("Body should be UTF-8"),
        }
    }

    async fn get(&mut self, uri: &str) -> TestResponse {
        self.send("GET", uri, None).await
    }

    async fn post(&mut self, uri: &str, form: &str) -> TestResponse {
        self.send("POST", uri, Some(form)).await
    }

    async fn add(&mut self, title: &str, started: &str, completed: &str) -> TestResponse {
        let form = format!(
            "title={}&author=Someone&date_started={}&date_completed={}",
            title.replace(' ', "+"),
            started,
            completed
        );
        self.post("/add", &form).await
    }
}

// =============================================================================
// Ambient endpoints
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app();
    let mut client = Client::new(&app);

    let response = client.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "bkm-web");
    assert!(body["version"].is_string());
    assert_eq!(body["today"], "2022-06-15");
    assert_eq!(body["sessions"], 0, "health checks should not open sessions");
}

#[tokio::test]
async fn test_health_counts_sessions() {
    let app = setup_app();
    let mut alice = Client::new(&app);
    let mut bob = Client::new(&app);

    alice.get("/").await;
    alice.get("/").await;
    bob.get("/").await;

    let response = alice.get("/health").await;
    let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["sessions"], 2);
}

#[tokio::test]
async fn test_build_info_endpoint() {
    let app = setup_app();
    let mut client = Client::new(&app);

    let response = client.get("/api/buildinfo").await;
    assert_eq!(response.status, StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert!(body["git_hash"].is_string());
    assert!(body["build_profile"].is_string());
}

#[tokio::test]
async fn test_static_assets_served() {
    let app = setup_app();
    let mut client = Client::new(&app);

    let js = client.get("/javascripts/application.js").await;
    assert_eq!(js.status, StatusCode::OK);
    assert_eq!(
        js.headers.get(header::CONTENT_TYPE).unwrap(),
        "application/javascript"
    );
    assert!(js.body.contains("not_started"));

    let css = client.get("/stylesheets/application.css").await;
    assert_eq!(css.status, StatusCode::OK);
}

// =============================================================================
// Session
// =============================================================================

#[tokio::test]
async fn test_first_visit_sets_session_cookie() {
    let app = setup_app();
    let mut client = Client::new(&app);

    let response = client.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    let set_cookie = response
        .headers
        .get(header::SET_COOKIE)
        .expect("first visit should set a cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("bkm_session="));
    assert!(set_cookie.contains("HttpOnly"));

    // Known session: no new cookie
    let again = client.get("/").await;
    assert!(again.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_sessions_do_not_share_books() {
    let app = setup_app();
    let mut alice = Client::new(&app);
    let mut bob = Client::new(&app);

    alice.get("/").await;
    bob.get("/").await;
    alice.add("Middlemarch", "", "").await;

    assert!(alice.get("/").await.body.contains("Middlemarch"));
    assert!(!bob.get("/").await.body.contains("Middlemarch"));
}

// =============================================================================
// Add
// =============================================================================

#[tokio::test]
async fn test_add_form_renders() {
    let app = setup_app();
    let mut client = Client::new(&app);

    let response = client.get("/add").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(r#"action="/add""#));
    assert!(response.body.contains(r#"name="date_completed""#));
}

#[tokio::test]
async fn test_add_book_redirects_with_flash_shown_once() {
    let app = setup_app();
    let mut client = Client::new(&app);

    let response = client.add("Dune", "", "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));

    let list = client.get("/").await;
    assert!(list.body.contains("&#39;Dune&#39; successfully added."));
    assert!(list.body.contains(r#"action="/start/0""#));

    let again = client.get("/").await;
    assert!(!again.body.contains("successfully added"));
    assert!(again.body.contains("Dune"));
}

#[tokio::test]
async fn test_add_with_empty_title_is_rejected() {
    let app = setup_app();
    let mut client = Client::new(&app);

    let response = client
        .post("/add", "title=&author=Frank+Herbert&date_started=&date_completed=")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("You must enter a title."));
    assert!(!response.body.contains("Title must be between"));
    // Other entered values survive the round trip
    assert!(response.body.contains(r#"value="Frank Herbert""#));

    let list = client.get("/").await;
    assert!(!list.body.contains("Frank Herbert"));
    assert!(!list.body.contains(r#"action="/start/0""#));
}

#[tokio::test]
async fn test_add_with_missing_date_fields() {
    // Disabled inputs are not submitted at all
    let app = setup_app();
    let mut client = Client::new(&app);

    let response = client.post("/add", "title=Emma&author=Jane+Austen").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_add_with_malformed_date_is_a_validation_message() {
    let app = setup_app();
    let mut client = Client::new(&app);

    let response = client.add("Dune", "2022-13-40", "").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .body
        .contains("Date started must be a valid date (YYYY-MM-DD)."));
}

#[tokio::test]
async fn test_add_with_future_start_is_rejected() {
    let app = setup_app();
    let mut client = Client::new(&app);

    let response = client.add("Dune", "2022-06-16", "").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .body
        .contains("Date started must be today&#39;s date or earlier."));
}

#[tokio::test]
async fn test_titles_are_escaped() {
    let app = setup_app();
    let mut client = Client::new(&app);

    client.add("%3Cb%3Ebold%3C%2Fb%3E", "", "").await;
    let list = client.get("/").await;
    assert!(list.body.contains("&lt;b&gt;bold&lt;/b&gt;"));
    assert!(!list.body.contains("<b>bold</b>"));
}

// =============================================================================
// Edit
// =============================================================================

#[tokio::test]
async fn test_edit_form_prefilled() {
    let app = setup_app();
    let mut client = Client::new(&app);

    client.add("Dune", "2022-01-02", "").await;
    let response = client.get("/edit/0").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(r#"action="/edit/0""#));
    assert!(response.body.contains(r#"value="Dune""#));
    assert!(response.body.contains(r#"value="2022-01-02""#));
}

#[tokio::test]
async fn test_edit_updates_in_place() {
    let app = setup_app();
    let mut client = Client::new(&app);

    client.add("Dune", "", "").await;
    let response = client
        .post(
            "/edit/0",
            "title=Dune+Messiah&author=Frank+Herbert&date_started=2022-01-01&date_completed=2022-02-01",
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let list = client.get("/").await;
    assert!(list.body.contains("&#39;Dune Messiah&#39; has been updated."));
    assert!(list.body.contains("January 1, 2022"));
    assert!(list.body.contains("February 1, 2022"));
    assert!(list.body.contains(r#"href="/edit/0""#));
}

#[tokio::test]
async fn test_edit_with_completion_before_start_leaves_record_unchanged() {
    let app = setup_app();
    let mut client = Client::new(&app);

    for i in 0..4 {
        client.add(&format!("Book {}", i), "", "").await;
    }
    client.get("/").await;

    let response = client
        .post(
            "/edit/3",
            "title=Changed&author=Changed&date_started=2021-02-01&date_completed=2021-01-01",
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("must be after date started"));
    assert!(response.body.contains(r#"value="Changed""#));

    let form = client.get("/edit/3").await;
    assert!(form.body.contains(r#"value="Book 3""#));
    assert!(!form.body.contains("Changed"));
}

// =============================================================================
// Delete / Start / Finish
// =============================================================================

#[tokio::test]
async fn test_delete_removes_only_that_book() {
    let app = setup_app();
    let mut client = Client::new(&app);

    for i in 0..9 {
        client.add(&format!("Book {}", i), "", "").await;
    }
    client.get("/").await;

    let response = client.post("/delete/7", "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let list = client.get("/").await;
    assert!(list.body.contains("&#39;Book 7&#39; has been deleted."));

    let list = client.get("/").await;
    assert!(!list.body.contains("Book 7"));
    for i in (0..9).filter(|i| *i != 7) {
        assert!(list.body.contains(&format!("Book {}", i)));
        assert!(list.body.contains(&format!(r#"action="/delete/{}""#, i)));
    }
}

#[tokio::test]
async fn test_start_then_finish_moves_between_shelves() {
    let app = setup_app();
    let mut client = Client::new(&app);

    client.add("Dune", "", "").await;
    let list = client.get("/").await;
    assert!(list.body.contains(r#"action="/start/0""#));

    let response = client.post("/start/0", "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let list = client.get("/").await;
    assert!(list.body.contains("&#39;Dune&#39; started today."));
    assert!(list.body.contains(r#"action="/finish/0""#));
    assert!(!list.body.contains(r#"action="/start/0""#));
    assert!(list.body.contains("June 15, 2022"));

    let response = client.post("/finish/0", "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let list = client.get("/").await;
    assert!(list.body.contains("&#39;Dune&#39; completed today."));
    assert!(!list.body.contains(r#"action="/finish/0""#));
    assert!(!list.body.contains(r#"action="/start/0""#));
    assert_eq!(list.body.matches("June 15, 2022").count(), 2);
}

#[tokio::test]
async fn test_start_of_read_book_shows_error() {
    let app = setup_app();
    let mut client = Client::new(&app);

    client.add("Dune", "2022-01-01", "2022-02-01").await;
    client.get("/").await;

    let response = client.post("/start/0", "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let list = client.get("/").await;
    assert!(list.body.contains("&#39;Dune&#39; has already been read."));
    assert!(list.body.contains("January 1, 2022"));
}

// =============================================================================
// Error handling
// =============================================================================

#[tokio::test]
async fn test_unknown_book_id_is_404() {
    let app = setup_app();
    let mut client = Client::new(&app);
    client.add("Dune", "", "").await;

    let form = "title=X&author=Y&date_started=&date_completed=";
    let responses = [
        client.get("/edit/42").await,
        client.post("/edit/42", form).await,
        client.post("/delete/42", "").await,
        client.post("/start/42", "").await,
        client.post("/finish/42", "").await,
    ];
    for response in responses {
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert!(response.body.contains("Book 42 was not found."));
    }

    // Existing book untouched
    assert!(client.get("/").await.body.contains("Dune"));
}

#[tokio::test]
async fn test_non_numeric_id_is_400() {
    let app = setup_app();
    let mut client = Client::new(&app);

    let response = client.get("/edit/abc").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
