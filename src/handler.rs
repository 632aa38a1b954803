use std::sync::Arc;

use axum::{Json, response::IntoResponse};
use tracing::info;

use crate::api::StatusResponse;
use crate::db::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub api_token: Arc<str>,
}

impl AppState {
    pub fn new(db: Database, api_token: &str) -> Self {
        AppState {
            db: Arc::new(db),
            api_token: Arc::from(api_token),
        }
    }
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(StatusResponse {
        status: "ok".to_owned(),
    })
}
