use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing '{0}' in request body")]
    MissingField(&'static str),

    #[error("Rating must be a number between 0 and 5")]
    InvalidRating,

    #[error("Request body must contain either 'title', 'url', 'description' or 'rating'")]
    EmptyPatch,

    #[error("{0}")]
    MalformedBody(String),

    #[error("Bookmark Not Found")]
    NotFound,

    #[error("Unauthorized request")]
    Unauthorized,

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        use ApiError::*;
        match self {
            MissingField(_) | InvalidRating | EmptyPatch | MalformedBody(_) => StatusCode::BAD_REQUEST,
            NotFound => StatusCode::NOT_FOUND,
            Unauthorized => StatusCode::UNAUTHORIZED,
            Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // Plain text, unlike every other client error.
            e @ ApiError::InvalidRating => {
                (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], e.to_string()).into_response()
            }
            ApiError::Unauthorized => {
                (status, Json(serde_json::json!({ "error": "Unauthorized request" }))).into_response()
            }
            ApiError::Storage(e) => {
                tracing::error!("bookmark store call failed: {:#}", e);
                (status, Json(ErrorBody::new("Internal server error"))).into_response()
            }
            other => (status, Json(ErrorBody::new(&other.to_string()))).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::MissingField("url").to_string(), "Missing 'url' in request body");
        assert_eq!(ApiError::InvalidRating.to_string(), "Rating must be a number between 0 and 5");
        assert_eq!(ApiError::NotFound.to_string(), "Bookmark Not Found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::EmptyPatch.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Storage(anyhow::anyhow!("disk on fire")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_message_includes_source_chain() {
        let err = anyhow::anyhow!("no such table").context("list bookmarks");
        let msg = ApiError::Storage(err).to_string();
        assert!(msg.contains("list bookmarks"));
        assert!(msg.contains("no such table"));
    }

    #[tokio::test]
    async fn test_storage_response_hides_underlying_error() {
        let response = ApiError::Storage(anyhow::anyhow!("no such table: bookmarks")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, serde_json::json!({ "error": { "message": "Internal server error" } }));
    }
}
