use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("webhook returned status {0}")]
    Status(StatusCode),
    #[error("webhook reply carried no text field")]
    EmptyReply,
}

/// Relays chat messages to the external completion webhook.
pub struct ChatService {
    client: Client,
    webhook_url: String,
}

impl ChatService {
    pub fn new(webhook_url: String) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }

    /// POST the message to the webhook and return the bot's reply text.
    pub async fn relay(&self, session_id: &str, message: &str) -> Result<String, ChatError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&json!({ "message": message, "session_id": session_id }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::warn!("Chat webhook error {}: {}", status, text);
            return Err(ChatError::Status(status));
        }

        let body: Value = response.json().await?;
        extract_reply(&body).ok_or(ChatError::EmptyReply)
    }
}

/// The webhook answers with the reply under one of several keys depending on
/// the workflow version; take the first non-empty string among them.
pub fn extract_reply(body: &Value) -> Option<String> {
    ["output", "botResponse", "message"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
