//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::WatchedCourse;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Polling behavior
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Course search endpoint and HTTP settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Notification backend selection and credentials
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Log level and destination
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Liveness listener and keep-alive ping
    #[serde(default)]
    pub health: HealthConfig,

    /// Courses to watch
    #[serde(default)]
    pub courses: Vec<WatchedCourse>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply `PORT` and `RENDER_EXTERNAL_URL` from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("PORT").ok(),
            std::env::var("RENDER_EXTERNAL_URL").ok(),
        );
    }

    fn apply_overrides(&mut self, port: Option<String>, external_url: Option<String>) {
        if let Some(port) = port.and_then(|p| p.trim().parse::<u16>().ok()) {
            self.health.port = port;
        }
        if self.health.keep_alive_url.is_none() {
            self.health.keep_alive_url = external_url.filter(|u| !u.trim().is_empty());
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.monitor.check_interval_secs == 0 {
            return Err(AppError::validation(
                "monitor.check_interval_secs must be > 0",
            ));
        }
        if self.search.user_agent.trim().is_empty() {
            return Err(AppError::validation("search.user_agent is empty"));
        }
        if self.search.timeout_secs == 0 {
            return Err(AppError::validation("search.timeout_secs must be > 0"));
        }
        if self.notify.timeout_secs == 0 {
            return Err(AppError::validation("notify.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.search.base_url)?;

        match self.notify.method {
            NotificationMethod::Ntfy if self.notify.ntfy_topic.trim().is_empty() => {
                return Err(AppError::validation(
                    "notify.ntfy_topic is required for the ntfy method",
                ));
            }
            NotificationMethod::Discord if self.notify.discord_webhook_url.trim().is_empty() => {
                return Err(AppError::validation(
                    "notify.discord_webhook_url is required for the discord method",
                ));
            }
            _ => {}
        }

        if self.courses.is_empty() {
            return Err(AppError::validation("No courses defined"));
        }
        for (i, course) in self.courses.iter().enumerate() {
            if course.label.trim().is_empty() {
                return Err(AppError::validation(format!("courses[{i}] needs a label")));
            }
            if course.course_sec.trim().is_empty() || course.term.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "courses[{i}] ({}) needs both course_sec and term",
                    course.label
                )));
            }
        }
        Ok(())
    }
}

/// Poll loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds to sleep between poll cycles
    #[serde(default = "defaults::check_interval")]
    pub check_interval_secs: u64,

    /// Path of the JSON state snapshot
    #[serde(default = "defaults::state_file")]
    pub state_file: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: defaults::check_interval(),
            state_file: defaults::state_file(),
        }
    }
}

/// Course search endpoint and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search results endpoint
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Accept header for HTTP requests
    #[serde(default = "defaults::accept")]
    pub accept: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::search_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            accept: defaults::accept(),
            timeout_secs: defaults::search_timeout(),
        }
    }
}

/// Available notification backends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMethod {
    #[default]
    Ntfy,
    Discord,
}

/// Notification backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Which backend receives alerts
    #[serde(default)]
    pub method: NotificationMethod,

    /// ntfy server base URL
    #[serde(default = "defaults::ntfy_server")]
    pub ntfy_server: String,

    /// ntfy topic name
    #[serde(default)]
    pub ntfy_topic: String,

    /// Discord webhook URL
    #[serde(default)]
    pub discord_webhook_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::notify_timeout")]
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            method: NotificationMethod::default(),
            ntfy_server: defaults::ntfy_server(),
            ntfy_topic: String::new(),
            discord_webhook_url: String::new(),
            timeout_secs: defaults::notify_timeout(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level: debug, info, warn, error
    #[serde(default = "defaults::log_level")]
    pub level: String,

    /// File that receives a copy of every log line
    #[serde(default = "defaults::log_file")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            file: defaults::log_file(),
        }
    }
}

/// Liveness listener and keep-alive settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Serve the liveness endpoint
    #[serde(default = "defaults::health_enabled")]
    pub enabled: bool,

    /// Port for the liveness endpoint
    #[serde(default = "defaults::health_port")]
    pub port: u16,

    /// URL pinged periodically so the host does not idle
    #[serde(default)]
    pub keep_alive_url: Option<String>,

    /// Seconds between keep-alive pings
    #[serde(default = "defaults::keep_alive_interval")]
    pub keep_alive_interval_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::health_enabled(),
            port: defaults::health_port(),
            keep_alive_url: None,
            keep_alive_interval_secs: defaults::keep_alive_interval(),
        }
    }
}

mod defaults {
    // Monitor defaults
    pub fn check_interval() -> u64 {
        180
    }
    pub fn state_file() -> String {
        "state.json".into()
    }

    // Search defaults
    pub fn base_url() -> String {
        "https://udapps.nss.udel.edu/CoursesSearch/search-results".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .into()
    }
    pub fn accept() -> String {
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".into()
    }
    pub fn search_timeout() -> u64 {
        15
    }

    // Notify defaults
    pub fn ntfy_server() -> String {
        "https://ntfy.sh".into()
    }
    pub fn notify_timeout() -> u64 {
        10
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
    pub fn log_file() -> Option<String> {
        Some("monitor.log".into())
    }

    // Health defaults
    pub fn health_enabled() -> bool {
        true
    }
    pub fn health_port() -> u16 {
        8000
    }
    pub fn keep_alive_interval() -> u64 {
        600
    }
}
