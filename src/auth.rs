use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::handler::AppState;

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Rejects requests whose `Authorization: Bearer` token does not match the
/// configured api token.
pub async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = matches!(bearer_token(&request), Some(token) if token == &*state.api_token);
    if !authorized {
        tracing::error!("Unauthorized request to path: {}", request.uri().path());
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}
