//! Book list and form handlers
//!
//! Every mutating handler either redirects to `/` with a flash message or
//! re-renders the originating form with validation messages and the values
//! the user entered.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use bkm_common::{BookForm, BookId, Error as CommonError};
use tracing::{debug, info};

use crate::error::Result;
use crate::session::Session;
use crate::{views, AppState};

/// GET /
///
/// Renders the three shelves and consumes any pending flash messages
pub async fn list_books(session: Session) -> (CookieJar, Html<String>) {
    let html = session
        .with(|s| {
            let flash = s.take_flash();
            views::index(
                &flash,
                &s.currently_reading(),
                &s.have_read(),
                &s.to_read(),
            )
        });
    debug!(session_id = %session.id(), "Rendered book list");
    (session.jar(), Html(html))
}

/// GET /add
pub async fn show_add_form() -> Html<String> {
    Html(views::add_form(&BookForm::default(), &[]))
}

/// POST /add
pub async fn add_book(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<BookForm>,
) -> Result<(CookieJar, Response)> {
    let today = (state.today)();

    match form.validate(today) {
        Ok(draft) => {
            session.with(|s| s.add(draft));
            Ok((session.jar(), Redirect::to("/").into_response()))
        }
        Err(CommonError::Validation(errors)) => {
            info!(errors = errors.len(), "Rejected add submission");
            let html = views::add_form(&form, &errors);
            Ok((session.jar(), Html(html).into_response()))
        }
        Err(other) => Err(other.into()),
    }
}

/// GET /edit/:id
pub async fn show_edit_form(
    Path(id): Path<BookId>,
    session: Session,
) -> Result<(CookieJar, Html<String>)> {
    let form = session.with(|s| s.find(id).map(views::form_for))?;
    Ok((session.jar(), Html(views::edit_form(id, &form, &[]))))
}

/// POST /edit/:id
///
/// A failed submission leaves the stored book untouched.
pub async fn edit_book(
    State(state): State<AppState>,
    Path(id): Path<BookId>,
    session: Session,
    Form(form): Form<BookForm>,
) -> Result<(CookieJar, Response)> {
    let today = (state.today)();

    // Unknown ids are a 404 whether or not the form is valid
    session.with(|s| s.find(id).map(|_| ()))?;

    match form.validate(today) {
        Ok(draft) => {
            session.with(|s| s.update(id, draft))?;
            Ok((session.jar(), Redirect::to("/").into_response()))
        }
        Err(CommonError::Validation(errors)) => {
            info!(book_id = id, errors = errors.len(), "Rejected edit submission");
            let html = views::edit_form(id, &form, &errors);
            Ok((session.jar(), Html(html).into_response()))
        }
        Err(other) => Err(other.into()),
    }
}

/// POST /delete/:id
pub async fn delete_book(
    Path(id): Path<BookId>,
    session: Session,
) -> Result<(CookieJar, Redirect)> {
    session.with(|s| s.delete(id))?;
    Ok((session.jar(), Redirect::to("/")))
}

/// POST /start/:id
pub async fn start_book(
    State(state): State<AppState>,
    Path(id): Path<BookId>,
    session: Session,
) -> Result<(CookieJar, Redirect)> {
    let today = (state.today)();
    session.with(|s| s.start(id, today))?;
    Ok((session.jar(), Redirect::to("/")))
}

/// POST /finish/:id
pub async fn finish_book(
    State(state): State<AppState>,
    Path(id): Path<BookId>,
    session: Session,
) -> Result<(CookieJar, Redirect)> {
    let today = (state.today)();
    session.with(|s| s.finish(id, today))?;
    Ok((session.jar(), Redirect::to("/")))
}
