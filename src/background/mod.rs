//! Auxiliary tasks that run beside the poll loop.
//!
//! Neither task shares state with the monitor, and both swallow their own
//! failures.

#[cfg(feature = "health")]
pub mod health;
pub mod keep_alive;

use tokio::task::JoinHandle;

use crate::models::HealthConfig;
use crate::utils::log::Logger;

/// Spawn the liveness responder and keep-alive ping as configured.
pub fn spawn_all(config: &HealthConfig, logger: &Logger) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::new();

    if config.enabled {
        spawn_health(config.port, logger, &mut handles);
    }

    if let Some(url) = config.keep_alive_url.clone().filter(|u| !u.trim().is_empty()) {
        let interval = std::time::Duration::from_secs(config.keep_alive_interval_secs);
        handles.push(tokio::spawn(keep_alive::run(url, interval, logger.clone())));
    }

    handles
}

#[cfg(feature = "health")]
fn spawn_health(port: u16, logger: &Logger, handles: &mut Vec<JoinHandle<()>>) {
    handles.push(tokio::spawn(health::serve(port, logger.clone())));
    logger.info(&format!("  Health server on port {port}"));
}

#[cfg(not(feature = "health"))]
fn spawn_health(_port: u16, logger: &Logger, _handles: &mut Vec<JoinHandle<()>>) {
    logger.debug("Health server not compiled in (feature `health`)");
}
