// src/utils/log.rs

//! Monitor logger with server-style formatting.
//!
//! A [`Logger`] is an explicit handle: the poll loop, the state store and the
//! notification backends each hold a clone. Every line is written to the
//! console and, when configured, appended to a log file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Local;

use crate::error::Result;

/// Log level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Parse a level name, defaulting to `Info`.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

enum Sink {
    Console,
    File(Mutex<File>),
    Memory(Mutex<Vec<String>>),
}

struct Inner {
    level: LogLevel,
    sinks: Vec<Sink>,
}

/// Cloneable logger handle.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

impl Logger {
    /// Console-only logger.
    pub fn console(level: &str) -> Self {
        Self::from_sinks(LogLevel::parse(level), vec![Sink::Console])
    }

    /// Console logger that also appends to `path`.
    pub fn with_file(level: &str, path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_sinks(
            LogLevel::parse(level),
            vec![Sink::Console, Sink::File(Mutex::new(file))],
        ))
    }

    /// Logger that keeps lines in memory, for inspecting output in tests.
    pub fn memory() -> Self {
        Self::from_sinks(LogLevel::Debug, vec![Sink::Memory(Mutex::new(Vec::new()))])
    }

    fn from_sinks(level: LogLevel, sinks: Vec<Sink>) -> Self {
        Self {
            inner: Arc::new(Inner { level, sinks }),
        }
    }

    /// Lines captured by a memory logger (empty for other sinks).
    pub fn captured(&self) -> Vec<String> {
        self.inner
            .sinks
            .iter()
            .filter_map(|sink| match sink {
                Sink::Memory(lines) => lines.lock().ok().map(|l| l.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.inner.level
    }

    fn write_line(&self, level: LogLevel, line: &str) {
        for sink in &self.inner.sinks {
            match sink {
                Sink::Console if level >= LogLevel::Warn => eprintln!("{line}"),
                Sink::Console => println!("{line}"),
                Sink::File(file) => {
                    if let Ok(mut file) = file.lock() {
                        let _ = writeln!(file, "{line}");
                    }
                }
                Sink::Memory(lines) => {
                    if let Ok(mut lines) = lines.lock() {
                        lines.push(line.to_string());
                    }
                }
            }
        }
    }

    fn log(&self, level: LogLevel, message: &str) {
        if self.should_log(level) {
            self.write_line(level, &format_log(level, message));
        }
    }

    /// Log a debug message
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log an info message
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log a warning message
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    /// Log an error message
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Log a separator line
    pub fn separator(&self) {
        self.info(&"─".repeat(60));
    }

    /// Log a header
    pub fn header(&self, title: &str) {
        let rule = "═".repeat(60);
        self.info(&rule);
        self.info(&format!("  {title}"));
        self.info(&rule);
    }
}

/// Format a log message with timestamp and level
fn format_log(level: LogLevel, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("[{}] [{}] {}", timestamp, level.as_str(), message)
}
