//! HTTP handlers for bkm-web

pub mod books;
pub mod buildinfo;
pub mod health;
pub mod ui;

pub use books::{
    add_book, delete_book, edit_book, finish_book, list_books, show_add_form, show_edit_form,
    start_book,
};
pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use ui::{serve_app_css, serve_app_js};
