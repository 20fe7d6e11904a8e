//! ntfy push backend.

use async_trait::async_trait;
use reqwest::Client;

use super::Notifier;
use crate::error::{AppError, Result};

/// Publishes plaintext messages to an ntfy topic.
pub struct NtfyNotifier {
    client: Client,
    topic_url: String,
}

impl NtfyNotifier {
    pub fn new(client: Client, server: &str, topic: &str) -> Self {
        Self {
            client,
            topic_url: format!("{}/{}", server.trim_end_matches('/'), topic),
        }
    }

    /// Topic URL messages are posted to.
    pub fn topic_url(&self) -> &str {
        &self.topic_url
    }

    /// ntfy priority header value.
    pub fn priority(urgent: bool) -> &'static str {
        if urgent { "max" } else { "default" }
    }
}

#[async_trait]
impl Notifier for NtfyNotifier {
    fn name(&self) -> &'static str {
        "ntfy"
    }

    async fn send(&self, title: &str, body: &str, urgent: bool) -> Result<()> {
        self.client
            .post(&self.topic_url)
            .header("Title", title)
            .header("Priority", Self::priority(urgent))
            .body(body.to_string())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::notify(self.name(), e))?;
        Ok(())
    }
}
