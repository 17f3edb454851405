use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use super::message::ChatMessage;

/// Client for the upstream chat datastore, reached through the same backend
/// that handles audio processing.
#[derive(Clone)]
pub struct ChatStore {
    client: reqwest::Client,
    base_url: String,
}

impl ChatStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the full ordered chat history.
    pub async fn fetch(&self) -> Result<Vec<ChatMessage>> {
        let url = format!("{}/chats", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Chat history request failed")?
            .error_for_status()
            .context("Chat history request rejected")?;

        let messages: Vec<ChatMessage> = response
            .json()
            .await
            .context("Chat history payload was not valid JSON")?;

        info!("Fetched {} chat messages", messages.len());
        Ok(messages)
    }

    /// Persist the full message list upstream. Returns the upstream ack.
    pub async fn save(&self, messages: &[ChatMessage]) -> Result<serde_json::Value> {
        let url = format!("{}/chats", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "messages": messages }))
            .send()
            .await
            .context("Chat save request failed")?
            .error_for_status()
            .context("Chat save rejected")?;

        info!("Saved {} chat messages", messages.len());
        response
            .json()
            .await
            .context("Chat save ack was not valid JSON")
    }
}
