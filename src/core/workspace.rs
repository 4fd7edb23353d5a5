//! Workspace discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the marker directory at a workspace root
pub const WORKSPACE_DIR: &str = ".ptrack";

/// A directory tree whose root contains `.ptrack/`
#[derive(Debug)]
pub struct Workspace {
    /// Root directory of the workspace (parent of .ptrack/)
    root: PathBuf,
}

impl Workspace {
    /// Find the workspace root by walking up from the current directory
    pub fn discover() -> Result<Self, WorkspaceError> {
        let current = std::env::current_dir().map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the workspace root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, WorkspaceError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        loop {
            if current.join(WORKSPACE_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(WorkspaceError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new workspace at the given path
    pub fn init(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if root.join(WORKSPACE_DIR).exists() {
            return Err(WorkspaceError::AlreadyExists(root));
        }
        Self::create(root)
    }

    /// Initialize even if .ptrack/ exists; existing data files are kept
    pub fn init_force(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create(root)
    }

    fn create(root: PathBuf) -> Result<Self, WorkspaceError> {
        let workspace = Self { root };
        std::fs::create_dir_all(workspace.data_dir())
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        std::fs::write(workspace.config_path(), Self::default_config())
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        Ok(workspace)
    }

    fn default_config() -> &'static str {
        r#"# ptrack workspace configuration

# Directory holding users.json, projects.json and tasks.json
# (default: .ptrack/data next to this file)
# data_dir: ""

# Default output format (auto, table, json, yaml, csv, id)
# default_format: auto

# Highlight projects due within this many days
# due_soon_days: 7
"#
    }

    /// Get the workspace root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .ptrack directory
    pub fn ptrack_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    /// Directory holding the entity documents
    pub fn data_dir(&self) -> PathBuf {
        self.ptrack_dir().join("data")
    }

    /// Workspace configuration file
    pub fn config_path(&self) -> PathBuf {
        self.ptrack_dir().join("config.yaml")
    }
}

/// Errors that can occur during workspace operations
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("not a ptrack workspace (searched from {searched_from:?}). Run 'ptrack init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("ptrack workspace already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
