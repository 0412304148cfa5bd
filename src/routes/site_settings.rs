use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    middleware::admin::AdminAuth,
    models::site_settings::{SiteSettings, UpdateSiteSettingsRequest},
    AppState,
};

/// GET /api/configuracion — public, the singleton settings row.
pub async fn get_site_settings(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let row = sqlx::query_as::<_, SiteSettings>(
        "SELECT * FROM site_settings ORDER BY created_at LIMIT 1",
    )
    .fetch_optional(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    match row {
        Some(settings) => Ok(Json(serde_json::to_value(settings).unwrap())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Site settings not configured" })),
        )),
    }
}

/// PUT /api/configuracion — read-modify-write of the two header texts.
pub async fn update_site_settings(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(body): Json<UpdateSiteSettingsRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if body.site_name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "site_name must not be empty" })),
        ));
    }

    let row = sqlx::query_as::<_, SiteSettings>(
        "UPDATE site_settings SET site_name = $1, site_subtitle = $2, updated_at = NOW()
         WHERE id = (SELECT id FROM site_settings ORDER BY created_at LIMIT 1)
         RETURNING *",
    )
    .bind(&body.site_name)
    .bind(&body.site_subtitle)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    match row {
        Some(settings) => Ok(Json(serde_json::to_value(settings).unwrap())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Site settings not configured" })),
        )),
    }
}
