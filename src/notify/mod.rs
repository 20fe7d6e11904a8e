//! Notification backends.
//!
//! One backend is chosen at startup from `[notify] method`:
//! - `ntfy`: push notification to an ntfy topic
//! - `discord`: embed posted to a Discord webhook
//!
//! [`NotificationDispatcher`] wraps the chosen backend. Delivery is
//! fire-and-forget: failures are logged and dropped.

mod discord;
mod ntfy;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NotificationMethod, NotifyConfig};
use crate::utils::http;
use crate::utils::log::Logger;

pub use discord::DiscordNotifier;
pub use ntfy::NtfyNotifier;

/// A notification transport.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short backend name for log lines.
    fn name(&self) -> &'static str;

    /// Deliver one message. Urgency only changes emphasis.
    async fn send(&self, title: &str, body: &str, urgent: bool) -> Result<()>;
}

/// Build the backend selected by configuration.
pub fn build_notifier(config: &NotifyConfig) -> Result<Box<dyn Notifier>> {
    let client = http::create_notify_client(config)?;
    let notifier: Box<dyn Notifier> = match config.method {
        NotificationMethod::Ntfy => Box::new(NtfyNotifier::new(
            client,
            &config.ntfy_server,
            &config.ntfy_topic,
        )),
        NotificationMethod::Discord => {
            Box::new(DiscordNotifier::new(client, &config.discord_webhook_url))
        }
    };
    Ok(notifier)
}

/// Sends alerts through one backend and swallows its failures.
pub struct NotificationDispatcher {
    backend: Box<dyn Notifier>,
    logger: Logger,
}

impl NotificationDispatcher {
    pub fn new(backend: Box<dyn Notifier>, logger: Logger) -> Self {
        Self { backend, logger }
    }

    /// Name of the wrapped backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Send a message; returns whether the backend accepted it.
    pub async fn notify(&self, title: &str, body: &str, urgent: bool) -> bool {
        match self.backend.send(title, body, urgent).await {
            Ok(()) => {
                self.logger.info(&format!(
                    "  [OK] {} sent{}",
                    self.backend.name(),
                    if urgent { " (urgent)" } else { "" }
                ));
                true
            }
            Err(e) => {
                self.logger
                    .error(&format!("  [FAIL] {}: {}", self.backend.name(), e));
                false
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingNotifier;
    use super::*;

    #[tokio::test]
    async fn test_dispatcher_forwards_message() {
        let backend = RecordingNotifier::default();
        let logger = Logger::memory();
        let dispatcher = NotificationDispatcher::new(Box::new(backend.clone()), logger.clone());

        assert!(dispatcher.notify("Seat opened - X", "body", false).await);

        let sent = backend.messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "Seat opened - X");
        assert!(!sent[0].urgent);
        assert!(logger.captured()[0].contains("[OK] recording sent"));
    }

    #[tokio::test]
    async fn test_dispatcher_swallows_failures() {
        let backend = RecordingNotifier::failing();
        let logger = Logger::memory();
        let dispatcher = NotificationDispatcher::new(Box::new(backend.clone()), logger.clone());

        assert!(!dispatcher.notify("t", "b", true).await);
        assert_eq!(backend.messages().len(), 1);
        assert!(logger.captured()[0].contains("[FAIL] recording"));
    }

    #[test]
    fn test_build_notifier_selects_backend() {
        let mut config = NotifyConfig {
            ntfy_topic: "seat-alerts".to_string(),
            ..NotifyConfig::default()
        };
        assert_eq!(build_notifier(&config).unwrap().name(), "ntfy");

        config.method = NotificationMethod::Discord;
        config.discord_webhook_url = "https://discord.com/api/webhooks/1/abc".to_string();
        assert_eq!(build_notifier(&config).unwrap().name(), "discord");
    }
}
