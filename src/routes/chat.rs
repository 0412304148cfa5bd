use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    middleware::rate_limit::{check_message_quota, refund_message_quota},
    AppState,
};

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// POST /api/chat — relay a user message to the completion webhook.
///
/// The caller identifies itself with an `X-Session-Id` header; free usage is
/// quota-limited per session in Redis. Client-side premium flags are a UI
/// hint only and are never consulted here.
pub async fn send_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let session_id = headers
        .get("X-Session-Id")
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .ok_or((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing X-Session-Id header" })),
        ))?
        .to_string();

    if body.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "message must not be empty" })),
        ));
    }

    let quota_key = format!("chat:quota:{}", session_id);
    let mut redis = state.redis.clone();
    check_message_quota(
        &mut redis,
        &quota_key,
        state.config.free_message_limit,
        state.config.free_message_window_secs,
    )
    .await?;

    let reply = match state.chat.relay(&session_id, &body.message).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("Chat relay failed: {e}");
            // The message never reached the bot; give the quota slot back
            refund_message_quota(&mut redis, &quota_key).await;
            return Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "El asistente no está disponible en este momento" })),
            ));
        }
    };

    Ok(Json(json!({ "reply": reply })))
}
