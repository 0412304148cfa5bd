use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub host: String,
    pub port: u16,
    pub admin_key: String,
    pub chat_webhook_url: String,
    pub free_message_limit: u64,
    pub free_message_window_secs: u64,
    pub images_dir: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            admin_key: env::var("ADMIN_KEY")
                .unwrap_or_else(|_| "change_this_admin_key".into()),
            chat_webhook_url: required("CHAT_WEBHOOK_URL")?,
            free_message_limit: env::var("FREE_MESSAGE_LIMIT")
                .unwrap_or_else(|_| "5".into())
                .parse()?,
            free_message_window_secs: env::var("FREE_MESSAGE_WINDOW_SECS")
                .unwrap_or_else(|_| "86400".into())
                .parse()?,
            images_dir: env::var("IMAGES_DIR").unwrap_or_else(|_| "/data/images".into()),
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}
