//! Session-scoped state files.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Serialize, de::DeserializeOwned};
use std::fs;
use std::io::ErrorKind;

/// Small JSON state files named `<prefix>-<key>.json` under one directory.
#[derive(Debug, Clone)]
pub struct StateManager {
    /// Directory holding the state files
    base_dir: Utf8PathBuf,
    /// Prefix for state file names
    prefix: String,
}

impl StateManager {
    /// Create a state manager rooted at `base_dir`.
    pub fn new(base_dir: impl Into<Utf8PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// Path of the state file for `key`.
    pub fn state_path(&self, key: &str) -> Utf8PathBuf {
        self.base_dir
            .join(format!("{}-{}.json", self.prefix, sanitize_key(key)))
    }

    /// Load state, `None` when the file does not exist.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.state_path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Cannot read session state {}", path));
            }
        };

        serde_json::from_str(&raw)
            .map(Some)
            .with_context(|| format!("Session state {} is not valid JSON", path))
    }

    /// Save state, creating the directory if needed.
    pub fn save<T: Serialize>(&self, key: &str, state: &T) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("Cannot create state directory {}", self.base_dir))?;

        let path = self.state_path(key);
        let content = serde_json::to_string_pretty(state)?;
        fs::write(&path, content)
            .with_context(|| format!("Cannot write session state {}", path))?;
        Ok(())
    }

    /// Delete state. Missing files are not an error.
    pub fn delete(&self, key: &str) -> Result<()> {
        let path = self.state_path(key);
        match fs::remove_file(&path) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                Err(e).with_context(|| format!("Cannot remove session state {}", path))
            }
            _ => Ok(()),
        }
    }

    pub fn exists(&self, key: &str) -> bool {
        self.state_path(key).exists()
    }
}

/// Keys come from user-controlled session ids; keep them to one path segment.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
