use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WelcomeMessage {
    pub id: Uuid,
    pub content: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWelcomeMessageRequest {
    /// Older admin clients send this field as `contenido`.
    #[serde(alias = "contenido")]
    pub content: String,
}
