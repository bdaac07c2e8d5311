//! Local HTTP hosting for the lead handler.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};

use crate::config::cli::HEALTH_PATH;
use crate::core::intake::LeadIntake;
use crate::core::{ConfigProvider, EmailSender};

/// 表單 body 的上限，超過就當作讀不到
pub const BODY_LIMIT: usize = 64 * 1024;

/// `path` 收所有 method，OPTIONS 與 405 由 handler 自己處理
pub fn router<E, C>(intake: Arc<LeadIntake<E, C>>, path: &str) -> Router
where
    E: EmailSender + 'static,
    C: ConfigProvider + 'static,
{
    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(path, any(lead::<E, C>))
        .with_state(intake)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "lead-intake"
    }))
}

async fn lead<E, C>(State(intake): State<Arc<LeadIntake<E, C>>>, request: Request) -> Response
where
    E: EmailSender + 'static,
    C: ConfigProvider + 'static,
{
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to read request body: {}", e);
            Bytes::new()
        }
    };

    intake
        .handle_request(::http::Request::from_parts(parts, bytes))
        .await
        .map(Body::from)
        .into_response()
}
