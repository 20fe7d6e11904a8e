//! Discord webhook backend.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use reqwest::Client;
use serde_json::{Value, json};

use super::Notifier;
use crate::error::{AppError, Result};

const URGENT_COLOR: u32 = 0xFF3333;
const NORMAL_COLOR: u32 = 0x00FF88;

/// Posts an embed per message to a Discord webhook.
pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
}

impl DiscordNotifier {
    pub fn new(client: Client, webhook_url: &str) -> Self {
        Self {
            client,
            webhook_url: webhook_url.to_string(),
        }
    }

    /// Webhook payload for one message.
    pub fn payload(title: &str, body: &str, urgent: bool, now: DateTime<Local>) -> Value {
        let title = if urgent {
            format!("[PRIORITY] {title}")
        } else {
            title.to_string()
        };
        let color = if urgent { URGENT_COLOR } else { NORMAL_COLOR };

        json!({
            "embeds": [{
                "title": title,
                "description": body,
                "color": color,
                "timestamp": now.to_rfc3339(),
            }]
        })
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn send(&self, title: &str, body: &str, urgent: bool) -> Result<()> {
        let payload = Self::payload(title, body, urgent, Local::now());
        self.client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::notify(self.name(), e))?;
        Ok(())
    }
}
