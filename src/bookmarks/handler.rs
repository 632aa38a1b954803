//! HTTP Handlers for the Bookmarks API

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::BookmarkStore;
use crate::api::BookmarkResponse;
use crate::error::ApiError;
use crate::handler::AppState;
use crate::model::{Bookmark, BookmarkPatch, NewBookmark};

const MIN_RATING: i64 = 0;
const MAX_RATING: i64 = 5;

// ============================================================================
// Request Bodies
// ============================================================================

/// Body of `POST /bookmarks`. Fields other than these four are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBookmarkBody {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub rating: Option<JsonValue>,
}

/// Body of `PATCH /bookmarks/:id`. Fields other than these four are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct PatchBookmarkBody {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub rating: Option<JsonValue>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accepts `4`, `4.0` and `"4"`; anything outside [0, 5] is rejected.
fn parse_rating(value: &JsonValue) -> Result<i32, ApiError> {
    let rating = match value {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match rating {
        Some(r) if (MIN_RATING..=MAX_RATING).contains(&r) => Ok(r as i32),
        _ => Err(ApiError::InvalidRating),
    }
}

impl CreateBookmarkBody {
    /// Required fields are checked in order and only the first missing one is
    /// reported.
    pub fn validate(self) -> Result<NewBookmark, ApiError> {
        let title = non_blank(self.title).ok_or(ApiError::MissingField("title"))?;
        let url = non_blank(self.url).ok_or(ApiError::MissingField("url"))?;
        let rating = self.rating.ok_or(ApiError::MissingField("rating"))?;
        let rating = parse_rating(&rating)?;

        Ok(NewBookmark {
            title,
            url,
            description: self.description,
            rating,
        })
    }
}

impl PatchBookmarkBody {
    pub fn validate(self) -> Result<BookmarkPatch, ApiError> {
        let title = non_blank(self.title);
        let url = non_blank(self.url);

        if title.is_none() && url.is_none() && self.description.is_none() && self.rating.is_none() {
            return Err(ApiError::EmptyPatch);
        }

        let rating = self.rating.as_ref().map(parse_rating).transpose()?;

        Ok(BookmarkPatch {
            title,
            url,
            description: self.description,
            rating,
        })
    }
}

fn read_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::error!("malformed request body: {}", rejection.body_text());
            Err(ApiError::MalformedBody(rejection.body_text()))
        }
    }
}

fn location(id: i64) -> String {
    format!("/bookmarks/{}", id)
}

/// Resolves a path id to a stored bookmark. Ids that are not integers can
/// never match a row and are reported as not found.
async fn find_bookmark(store: &BookmarkStore<'_>, raw_id: &str) -> Result<Bookmark, ApiError> {
    let found = match raw_id.parse::<i64>() {
        Ok(id) => store.get_by_id(id).await?,
        Err(_) => None,
    };

    found.ok_or_else(|| {
        tracing::error!("bookmark with id {} not found.", raw_id);
        ApiError::NotFound
    })
}

// ============================================================================
// Bookmark Handlers
// ============================================================================

pub async fn list_bookmarks(State(state): State<AppState>) -> Result<Response, ApiError> {
    let store = BookmarkStore::new(state.db.connection());

    let bookmarks: Vec<BookmarkResponse> = store
        .list_all()
        .await?
        .into_iter()
        .map(BookmarkResponse::from)
        .collect();

    tracing::info!("listed {} bookmarks", bookmarks.len());
    Ok((StatusCode::OK, Json(bookmarks)).into_response())
}

pub async fn get_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let store = BookmarkStore::new(state.db.connection());
    let bookmark = find_bookmark(&store, &id).await?;

    Ok((StatusCode::OK, Json(BookmarkResponse::from(bookmark))).into_response())
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    body: Result<Json<CreateBookmarkBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let input = read_body(body)?.validate().inspect_err(|e| {
        tracing::error!("rejected new bookmark: {}", e);
    })?;

    let store = BookmarkStore::new(state.db.connection());
    let bookmark = store.insert(input).await?;

    tracing::info!("bookmark with id {} created", bookmark.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location(bookmark.id))],
        Json(BookmarkResponse::from(bookmark)),
    )
        .into_response())
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<PatchBookmarkBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let store = BookmarkStore::new(state.db.connection());
    let bookmark = find_bookmark(&store, &id).await?;

    let patch = read_body(body)?.validate().inspect_err(|e| {
        tracing::error!("rejected update for bookmark {}: {}", bookmark.id, e);
    })?;

    // The row can disappear between the lookup and the write.
    if store.update(bookmark.id, patch).await? == 0 {
        tracing::error!("bookmark with id {} was removed before it could be updated", bookmark.id);
        return Err(ApiError::NotFound);
    }

    tracing::info!("bookmark with id {} updated", bookmark.id);
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let store = BookmarkStore::new(state.db.connection());
    let bookmark = find_bookmark(&store, &id).await?;

    if store.delete(bookmark.id).await? == 0 {
        tracing::error!("bookmark with id {} was removed before it could be deleted", bookmark.id);
        return Err(ApiError::NotFound);
    }

    tracing::info!("bookmark with id {} deleted", bookmark.id);
    Ok(StatusCode::NO_CONTENT.into_response())
}
