pub mod ads;
pub mod chat;
pub mod health;
pub mod images;
pub mod site_settings;
pub mod welcome_message;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// Catch-all for unregistered paths; every response stays JSON.
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Bare OPTIONS on any api path (true CORS preflights are answered by the
/// CorsLayer before reaching this).
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_path_yields_json_error() {
        let (status, Json(body)) = not_found().await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn bare_options_yields_no_content() {
        assert_eq!(preflight().await, StatusCode::NO_CONTENT);
    }
}
