use crate::model::Bookmark;
use crate::sanitize::filter_xss;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

/// `{"error": {"message": "..."}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorMessage,
}

impl ErrorBody {
    pub fn new(msg: &str) -> Self {
        ErrorBody {
            error: ErrorMessage {
                message: msg.to_owned(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Outbound representation of a bookmark. Markup in `title` and
/// `description` is neutralised here and nowhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkResponse {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub rating: i32,
}

impl From<Bookmark> for BookmarkResponse {
    fn from(bookmark: Bookmark) -> Self {
        BookmarkResponse {
            id: bookmark.id,
            title: filter_xss(&bookmark.title),
            url: bookmark.url,
            description: bookmark.description.as_deref().map(filter_xss),
            rating: bookmark.rating,
        }
    }
}
