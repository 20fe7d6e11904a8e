// src/models/mod.rs

//! Domain models for the seat monitor.
//!
//! This module contains the data structures shared by the parser, the diff
//! engine and the state store, plus the configuration types.

mod config;
mod course;
mod section;

use std::collections::BTreeMap;

// Re-export all public types
pub use config::{
    Config, HealthConfig, LoggingConfig, MonitorConfig, NotificationMethod, NotifyConfig,
    SearchConfig,
};
pub use course::{SectionFilter, WatchedCourse};
pub use section::SectionRecord;

/// Last observed record per composite key (`{term}_{code}`).
pub type StateMap = BTreeMap<String, SectionRecord>;
