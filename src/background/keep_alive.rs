//! Keep-alive ping.
//!
//! Periodically requests an external URL so hosts that sleep idle services
//! keep this one awake. Results are ignored.

use std::time::Duration;

use crate::utils::http;
use crate::utils::log::Logger;

const PING_TIMEOUT_SECS: u64 = 10;

/// Ping `url` every `interval`, forever. The first ping waits one interval.
pub async fn run(url: String, interval: Duration, logger: Logger) {
    let client = match http::create_client(PING_TIMEOUT_SECS) {
        Ok(client) => client,
        Err(e) => {
            logger.debug(&format!("Keep-alive disabled: {e}"));
            return;
        }
    };

    loop {
        tokio::time::sleep(interval).await;
        if let Err(e) = client.get(&url).send().await {
            logger.debug(&format!("Keep-alive ping to {url} failed: {e}"));
        }
    }
}
