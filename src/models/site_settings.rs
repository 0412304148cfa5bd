use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Singleton row holding the site header texts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SiteSettings {
    pub id: Uuid,
    pub site_name: String,
    pub site_subtitle: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSiteSettingsRequest {
    pub site_name: String,
    pub site_subtitle: String,
}
