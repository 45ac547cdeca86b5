//! Diagnostic logging.
//!
//! Appends one JSON object per line to a log file when diagnostics are
//! enabled. Logging never fails the caller.

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;

use crate::config::PortfolioConfig;

/// Longest `detail` kept in a log entry.
const MAX_DETAIL_LENGTH: usize = 500;

/// One diagnostic log line.
#[derive(Debug, Serialize)]
pub struct DiagnosticEntry {
    pub timestamp: DateTime<Utc>,
    /// Emitting component (e.g., "content", "gate")
    pub component: String,
    /// Short event name (e.g., "load_failed")
    pub event: String,
    /// Human readable detail, truncated
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl DiagnosticEntry {
    pub fn new(component: &str, event: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            component: component.to_string(),
            event: event.to_string(),
            detail: String::new(),
            context: None,
        }
    }

    pub fn with_detail(mut self, detail: &str) -> Self {
        self.detail = truncate(detail, MAX_DETAIL_LENGTH);
        self
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.context = Some(context.to_string());
        self
    }
}

/// Diagnostic sink bound to one log file.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    enabled: bool,
    path: Utf8PathBuf,
}

impl Diagnostics {
    pub fn new(enabled: bool, path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            enabled,
            path: path.into(),
        }
    }

    pub fn from_config(config: &PortfolioConfig) -> Self {
        Self::new(config.debug, config.log_path.clone())
    }

    /// A sink that drops everything.
    pub fn disabled() -> Self {
        Self::new(false, Utf8PathBuf::new())
    }

    /// Append an entry; I/O errors are swallowed.
    pub fn record(&self, entry: &DiagnosticEntry) {
        let _ = self.write(entry);
    }

    /// Shorthand for `record(DiagnosticEntry::new(..).with_detail(..))`.
    pub fn log(&self, component: &str, event: &str, detail: &str) {
        self.record(&DiagnosticEntry::new(component, event).with_detail(detail));
    }

    /// Log and echo to stderr as a warning.
    pub fn warn(&self, component: &str, event: &str, detail: &str) {
        eprintln!("Warning: {}", detail);
        self.log(component, event, detail);
    }

    fn write(&self, entry: &DiagnosticEntry) -> std::io::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let json = serde_json::to_string(entry).unwrap_or_default();
        writeln!(file, "{}", json)?;

        Ok(())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
