use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    middleware::admin::AdminAuth,
    models::advertisement::{Advertisement, CreateAdRequest, UpdateAdRequest},
    AppState,
};

/// GET /api/anuncios — all ads, newest first.
pub async fn list_ads(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let rows = sqlx::query_as::<_, Advertisement>(
        "SELECT * FROM advertisements ORDER BY created_at DESC",
    )
    .fetch_all(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok(Json(serde_json::to_value(rows).unwrap()))
}

/// GET /api/anuncios/activos — ads currently within their display window.
/// Must stay in sync with `Advertisement::is_displayable`.
pub async fn list_active_ads(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let rows = sqlx::query_as::<_, Advertisement>(
        "SELECT * FROM advertisements
         WHERE active = TRUE
           AND start_date <= NOW()
           AND (end_date IS NULL OR end_date >= NOW())
         ORDER BY created_at DESC",
    )
    .fetch_all(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok(Json(serde_json::to_value(rows).unwrap()))
}

/// POST /api/anuncios — create an ad; born active unless the body says otherwise.
pub async fn create_ad(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(body): Json<CreateAdRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    if body.title.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "title must not be empty" })),
        ));
    }

    let active = body.active.unwrap_or(true);
    let start_date = body.start_date.unwrap_or_else(Utc::now);

    let ad = sqlx::query_as::<_, Advertisement>(
        "INSERT INTO advertisements (title, description, image_url, link_url, active, start_date, end_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(&body.title)
    .bind(&body.description)
    .bind(&body.image_url)
    .bind(&body.link_url)
    .bind(active)
    .bind(start_date)
    .bind(body.end_date)
    .fetch_one(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok((StatusCode::CREATED, Json(serde_json::to_value(ad).unwrap())))
}

/// PUT /api/anuncios/{id} — partial update; omitted fields keep their value.
pub async fn update_ad(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAdRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let ad = sqlx::query_as::<_, Advertisement>(
        "UPDATE advertisements SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            image_url = COALESCE($4, image_url),
            link_url = COALESCE($5, link_url),
            active = COALESCE($6, active),
            start_date = COALESCE($7, start_date),
            end_date = COALESCE($8, end_date),
            updated_at = NOW()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&body.title)
    .bind(&body.description)
    .bind(&body.image_url)
    .bind(&body.link_url)
    .bind(body.active)
    .bind(body.start_date)
    .bind(body.end_date)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    match ad {
        Some(ad) => Ok(Json(serde_json::to_value(ad).unwrap())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Ad not found" })),
        )),
    }
}

/// DELETE /api/anuncios/{id}
pub async fn delete_ad(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let result = sqlx::query("DELETE FROM advertisements WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    if result.rows_affected() == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Ad not found" })),
        ));
    }

    Ok(Json(json!({ "success": true })))
}
