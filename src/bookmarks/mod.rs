//! Bookmarks Module
//!
//! CRUD over the `bookmarks` table: a thin store gateway, the HTTP handlers
//! that validate input and sanitize output, and the routes that mount them.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookmarks::bookmarks;
//!
//! let app = Router::new()
//!     .merge(bookmarks::routes())
//!     .with_state(app_state);
//!
//! // Use the store directly
//! let store = bookmarks::BookmarkStore::new(db.connection());
//! let all = store.list_all().await?;
//! ```

mod handler;
mod routes;
mod store;

pub use routes::routes;
pub use store::BookmarkStore;

/// Table definitions applied when the database is opened. Each statement is
/// idempotent.
pub fn schema() -> &'static [(&'static str, &'static str)] {
    &[("001_bookmarks.sql", include_str!("schema/001_bookmarks.sql"))]
}
