//! HTML rendering
//!
//! Pages are assembled from small string builders around a shared layout.
//! Every piece of user-supplied text goes through [`escape_html`].

use std::fmt::Write;

use axum::http::StatusCode;
use bkm_common::dates::{format_date, format_input};
use bkm_common::{Book, BookForm, BookId, Flash};

/// Escape text for HTML element content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, flash: &Flash, content: &str) -> String {
    let mut messages = String::new();
    if let Some(success) = &flash.success {
        let _ = write!(
            messages,
            r#"<p class="flash success">{}</p>"#,
            escape_html(success)
        );
    }
    messages.push_str(&error_list(&flash.errors));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title} | BookMinder</title>
  <link rel="stylesheet" href="/stylesheets/application.css">
  <script src="/javascripts/application.js" defer></script>
</head>
<body>
  <header><h1><a href="/">BookMinder</a></h1></header>
  <main>
{messages}
{content}
  </main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

fn error_list(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut html = String::from(r#"<ul class="flash errors">"#);
    for message in errors {
        let _ = write!(html, "<li>{}</li>", escape_html(message));
    }
    html.push_str("</ul>");
    html
}

fn action_button(action: &str, id: BookId, label: &str) -> String {
    format!(
        r#"<form class="inline" method="post" action="/{action}/{id}"><button type="submit">{label}</button></form>"#
    )
}

fn edit_link(id: BookId) -> String {
    format!(r#"<a href="/edit/{id}">Edit</a>"#)
}

fn date_cell(book_date: Option<chrono::NaiveDate>) -> String {
    book_date.map(format_date).unwrap_or_default()
}

fn table(heading: &str, columns: &[&str], rows: Vec<String>) -> String {
    let mut html = format!("<section>\n<h2>{heading}</h2>\n");
    if rows.is_empty() {
        html.push_str("<p class=\"empty\">No books here yet.</p>\n</section>\n");
        return html;
    }

    html.push_str("<table>\n<thead><tr>");
    for column in columns {
        let _ = write!(html, "<th>{column}</th>");
    }
    html.push_str("<th></th></tr></thead>\n<tbody>\n");
    for row in rows {
        html.push_str(&row);
    }
    html.push_str("</tbody>\n</table>\n</section>\n");
    html
}

/// List view: currently reading, read, and to-read tables
pub fn index(
    flash: &Flash,
    currently_reading: &[&Book],
    have_read: &[&Book],
    to_read: &[&Book],
) -> String {
    let reading_rows = currently_reading
        .iter()
        .map(|book| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{} {} {}</td></tr>\n",
                escape_html(&book.title),
                escape_html(&book.author),
                date_cell(book.date_started),
                action_button("finish", book.id, "Finish"),
                edit_link(book.id),
                action_button("delete", book.id, "Delete"),
            )
        })
        .collect();

    let read_rows = have_read
        .iter()
        .map(|book| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{} {}</td></tr>\n",
                escape_html(&book.title),
                escape_html(&book.author),
                date_cell(book.date_started),
                date_cell(book.date_completed),
                edit_link(book.id),
                action_button("delete", book.id, "Delete"),
            )
        })
        .collect();

    let to_read_rows = to_read
        .iter()
        .map(|book| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{} {} {}</td></tr>\n",
                escape_html(&book.title),
                escape_html(&book.author),
                action_button("start", book.id, "Start"),
                edit_link(book.id),
                action_button("delete", book.id, "Delete"),
            )
        })
        .collect();

    let mut content = String::from(r#"<p><a class="button" href="/add">Add a book</a></p>"#);
    content.push('\n');
    content.push_str(&table(
        "Currently Reading",
        &["Title", "Author", "Started"],
        reading_rows,
    ));
    content.push_str(&table(
        "Read",
        &["Title", "Author", "Started", "Completed"],
        read_rows,
    ));
    content.push_str(&table("To Read", &["Title", "Author"], to_read_rows));

    layout("My Books", flash, &content)
}

/// Form values for an existing book
pub fn form_for(book: &Book) -> BookForm {
    BookForm {
        title: book.title.clone(),
        author: book.author.clone(),
        date_started: format_input(book.date_started),
        date_completed: format_input(book.date_completed),
    }
}

fn checked(flag: bool) -> &'static str {
    if flag {
        " checked"
    } else {
        ""
    }
}

fn disabled(flag: bool) -> &'static str {
    if flag {
        " disabled"
    } else {
        ""
    }
}

fn book_form(action: &str, submit: &str, form: &BookForm) -> String {
    let not_started = form.date_started.trim().is_empty() && form.date_completed.trim().is_empty();
    let not_completed = form.date_completed.trim().is_empty();

    format!(
        r#"<form method="post" action="{action}">
  <p>
    <label for="title">Title</label>
    <input type="text" id="title" name="title" maxlength="70" value="{title}">
  </p>
  <p>
    <label for="author">Author</label>
    <input type="text" id="author" name="author" maxlength="70" value="{author}">
  </p>
  <p>
    <label for="date_started">Date started</label>
    <input type="date" id="date_started" name="date_started" value="{started}"{started_disabled}>
    <label><input type="checkbox" id="not_started"{not_started_checked}> Not yet started</label>
  </p>
  <p>
    <label for="date_completed">Date completed</label>
    <input type="date" id="date_completed" name="date_completed" value="{completed}"{completed_disabled}>
    <label><input type="checkbox" id="not_completed"{not_completed_checked}{not_completed_disabled}> Not yet completed</label>
  </p>
  <p>
    <button type="submit">{submit}</button>
    <a href="/">Cancel</a>
  </p>
</form>
"#,
        title = escape_html(&form.title),
        author = escape_html(&form.author),
        started = escape_html(form.date_started.trim()),
        completed = escape_html(form.date_completed.trim()),
        started_disabled = disabled(not_started),
        not_started_checked = checked(not_started),
        completed_disabled = disabled(not_completed),
        not_completed_checked = checked(not_completed),
        not_completed_disabled = disabled(not_started),
    )
}

/// Add form, pre-filled with a rejected submission when `errors` is non-empty
pub fn add_form(form: &BookForm, errors: &[String]) -> String {
    let content = format!(
        "<h2>Add a Book</h2>\n{}",
        book_form("/add", "Add book", form)
    );
    let flash = Flash {
        errors: errors.to_vec(),
        success: None,
    };
    layout("Add a Book", &flash, &content)
}

/// Edit form for book `id`
pub fn edit_form(id: BookId, form: &BookForm, errors: &[String]) -> String {
    let content = format!(
        "<h2>Edit Book</h2>\n{}",
        book_form(&format!("/edit/{id}"), "Save changes", form)
    );
    let flash = Flash {
        errors: errors.to_vec(),
        success: None,
    };
    layout("Edit Book", &flash, &content)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let content = format!(
        "<h2>{}</h2>\n<p>{}</p>\n<p><a href=\"/\">Back to my books</a></p>\n",
        status,
        escape_html(message)
    );
    layout(
        status.canonical_reason().unwrap_or("Error"),
        &Flash::default(),
        &content,
    )
}
