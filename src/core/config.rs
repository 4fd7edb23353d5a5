//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::workspace::Workspace;

/// Default window for "due soon" highlighting
pub const DEFAULT_DUE_SOON_DAYS: i64 = 7;

/// ptrack configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the entity documents
    pub data_dir: Option<PathBuf>,

    /// Default output format
    pub default_format: Option<String>,

    /// Highlight projects due within this many days
    pub due_soon_days: Option<i64>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/ptrack/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Workspace config (.ptrack/config.yaml)
        if let Ok(workspace) = Workspace::discover() {
            if let Some(local) = Self::read_file(&workspace.config_path()) {
                config.merge(local);
            }
        }

        // 4. Environment variables
        if let Ok(dir) = std::env::var("PTRACK_DATA_DIR") {
            if !dir.is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(format) = std::env::var("PTRACK_FORMAT") {
            config.default_format = Some(format);
        }

        config
    }

    /// Parse one config file; unreadable or malformed files are skipped
    pub fn read_file(path: &Path) -> Option<Config> {
        let contents = std::fs::read_to_string(path).ok()?;
        // The generated workspace config is all comments
        let blank = contents.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Some(Config::default());
        }
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ptrack")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Platform data directory used when no workspace is found
    fn global_data_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ptrack").map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.due_soon_days.is_some() {
            self.due_soon_days = other.due_soon_days;
        }
    }

    /// Days ahead a project counts as due soon
    pub fn due_soon_days(&self) -> i64 {
        self.due_soon_days.unwrap_or(DEFAULT_DUE_SOON_DAYS)
    }

    /// Decide where the entity documents live.
    ///
    /// Explicit flag, then configured/env `data_dir`, then the nearest
    /// workspace, then the platform data directory.
    pub fn data_dir(&self, flag: Option<&Path>) -> Option<PathBuf> {
        if let Some(dir) = flag {
            return Some(dir.to_path_buf());
        }
        if let Some(ref dir) = self.data_dir {
            return Some(dir.clone());
        }
        if let Ok(workspace) = Workspace::discover() {
            return Some(workspace.data_dir());
        }
        Self::global_data_dir()
    }
}
