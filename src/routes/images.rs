use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{middleware::admin::AdminAuth, AppState};

/// POST /api/anuncios/imagen — upload one ad image, returns its serving URL.
pub async fn upload_ad_image(
    State(state): State<AppState>,
    _auth: AdminAuth,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
    })? {
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let is_image = field
            .content_type()
            .map(|ct| ct.starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Only image uploads are accepted" })),
            ));
        }

        let ext = sanitize_extension(&file_name);
        let data = field.bytes().await.map_err(|e| {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
        })?;

        tokio::fs::create_dir_all(&state.config.images_dir)
            .await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

        let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
        let path = std::path::PathBuf::from(&state.config.images_dir).join(&stored_name);
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

        return Ok((
            StatusCode::CREATED,
            Json(json!({ "url": format!("/api/imagenes/{}", stored_name) })),
        ));
    }

    Err((
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "No image file in request" })),
    ))
}

/// GET /api/imagenes/{name} — serve an uploaded image.
pub async fn serve_image(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, StatusCode> {
    let file_path = std::path::PathBuf::from(&state.config.images_dir).join(&name);

    // Security: ensure the path doesn't escape the images directory
    let canonical_dir = std::fs::canonicalize(&state.config.images_dir)
        .map_err(|_| StatusCode::NOT_FOUND)?;
    let canonical_file = match std::fs::canonicalize(&file_path) {
        Ok(p) => p,
        Err(_) => return Err(StatusCode::NOT_FOUND),
    };
    if !canonical_file.starts_with(&canonical_dir) {
        return Err(StatusCode::FORBIDDEN);
    }

    let bytes = tokio::fs::read(&canonical_file)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    let content_type = mime_guess::from_path(&canonical_file)
        .first_raw()
        .unwrap_or("application/octet-stream");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, bytes.len().to_string())
        .body(Body::from(bytes))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Keep only a short alphanumeric extension; anything odd becomes "bin".
fn sanitize_extension(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= 5
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".into())
}

#[cfg(test)]
mod tests {
    use super::sanitize_extension;

    #[test]
    fn keeps_normal_extensions() {
        assert_eq!(sanitize_extension("banner.PNG"), "png");
        assert_eq!(sanitize_extension("foto.final.webp"), "webp");
    }

    #[test]
    fn rejects_odd_extensions() {
        assert_eq!(sanitize_extension("noextension"), "bin");
        assert_eq!(sanitize_extension("weird.ex t"), "bin");
        assert_eq!(sanitize_extension("dots."), "bin");
        assert_eq!(sanitize_extension("long.jpegjpeg"), "bin");
    }
}
