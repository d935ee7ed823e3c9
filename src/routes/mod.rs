//! HTTP routes

use std::path::Path;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::services::ServeDir;

use crate::conversation::{ChatRequest, ChatResponse};
use crate::core::RelayError;
use crate::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, RelayError> {
    let Json(request) = payload.map_err(|e| RelayError::BadRequest(e.body_text()))?;

    let reply = state.relay.handle_chat(request).await?;

    Ok(Json(ChatResponse::Reply { reply }))
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ChatResponse::Error {
            error: self.client_message(),
        };
        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

/// API routes, with everything else served from `static_dir`
pub fn router(static_dir: &Path) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .fallback_service(ServeDir::new(static_dir))
}
