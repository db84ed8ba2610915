//! Saved timer state as written by the page, and loading it from disk.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A single timer as persisted by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerData {
    /// Display name, possibly containing HTML character references.
    pub name: String,
    /// Elapsed time in milliseconds.
    pub time: u64,
    /// Whether the timer is currently accumulating time.
    pub is_running: bool,
}

impl TimerData {
    pub fn new(name: impl Into<String>, time: u64, is_running: bool) -> Self {
        Self {
            name: name.into(),
            time,
            is_running,
        }
    }
}

/// Timers keyed by their identifier.
pub type TimerContainer = HashMap<String, TimerData>;

/// Snapshot of the page's saved state. Fields beyond `timers` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSave {
    pub timers: TimerContainer,
}

/// Error reading a saved snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read a `LocalSave` snapshot from a JSON file.
pub fn load_save(path: &Path) -> Result<LocalSave, SaveError> {
    let content = std::fs::read_to_string(path)?;
    let save = serde_json::from_str(&content)?;
    Ok(save)
}
