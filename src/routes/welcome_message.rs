use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    middleware::admin::AdminAuth,
    models::welcome_message::{UpdateWelcomeMessageRequest, WelcomeMessage},
    AppState,
};

/// GET /api/mensaje_bienvenida — public, returns the active welcome row.
pub async fn get_welcome_message(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let row = sqlx::query_as::<_, WelcomeMessage>(
        "SELECT * FROM welcome_messages WHERE active = TRUE ORDER BY created_at DESC LIMIT 1",
    )
    .fetch_optional(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    match row {
        Some(msg) => Ok(Json(serde_json::to_value(msg).unwrap())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No active welcome message" })),
        )),
    }
}

/// PUT /api/mensaje_bienvenida — replace the content of the active row.
/// Last write wins; there is no version check.
pub async fn update_welcome_message(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(body): Json<UpdateWelcomeMessageRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if body.content.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "content must not be empty" })),
        ));
    }

    let row = sqlx::query_as::<_, WelcomeMessage>(
        "UPDATE welcome_messages SET content = $1, updated_at = NOW()
         WHERE active = TRUE RETURNING *",
    )
    .bind(&body.content)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    match row {
        Some(msg) => Ok(Json(serde_json::to_value(msg).unwrap())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No active welcome message" })),
        )),
    }
}
