//! Application settings management
//!
//! Reads configuration from a plain JSON file next to the credential store.
//! Missing fields fall back to their defaults; command line flags override
//! whatever is loaded here.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use crate::credential::DEFAULT_SOURCE_KINDS;
use crate::error::Result;

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Namespace used when `--namespace` is not given
    pub default_namespace: String,
    /// Output format used when `--output` is not given
    pub output: String,
    /// Editor command line (falls back to VISUAL / EDITOR)
    pub editor: Option<String>,
    /// Stop waiting for the editor after this many seconds (unset = wait forever)
    pub editor_timeout_secs: Option<u64>,
    /// Print diagnostics for otherwise silent outcomes
    pub debug: bool,
    /// Credential source kinds accepted by the store
    pub source_kinds: Vec<String>,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self {
            version: 1,
            default_namespace: String::new(),
            output: "table".to_string(),
            editor: None,
            editor_timeout_secs: None,
            debug: false,
            source_kinds: DEFAULT_SOURCE_KINDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Editor timeout as a duration
    pub fn editor_timeout(&self) -> Option<Duration> {
        self.editor_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads settings from the data directory
pub struct SettingsManager {
    settings: Settings,
}

impl SettingsManager {
    /// Load settings from the given directory, using defaults if unreadable
    pub fn new(storage_dir: &Path) -> Self {
        let settings_file = storage_dir.join("settings.json");
        let settings = Self::load_from_file(&settings_file).unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings file {:?}: {}", settings_file, e);
            Settings::default()
        });

        Self { settings }
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::new());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }
}
