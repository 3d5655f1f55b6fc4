//! Error types for zel
//!
//! Corrupt state files and a missing module manifest are not errors: they are
//! logged and degrade to empty values. Everything else surfaces here.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Captured outcome of a failed external operation (git, venv, pip).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFailure {
    /// Exit code when the process ran to completion
    pub code: Option<i32>,
    /// Captured standard error, or the spawn/library error text
    pub diagnostic: String,
}

impl ToolFailure {
    pub fn new(code: Option<i32>, diagnostic: impl Into<String>) -> Self {
        Self {
            code,
            diagnostic: diagnostic.into(),
        }
    }
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let diagnostic = self.diagnostic.trim();
        match self.code {
            Some(code) if diagnostic.is_empty() => write!(f, "exited with status {code}"),
            Some(code) => write!(f, "exited with status {code}: {diagnostic}"),
            None => write!(f, "{diagnostic}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ZelError {
    /// Path key has neither a stored value nor a default
    #[error("Path '{key}' not found. Use 'zel path set {key} <PATH>' or --save to set it.")]
    PathNotFound { key: String },

    /// Module name absent from the registry
    #[error("Module '{name}' not found. Available modules: {available}")]
    ModuleNotFound { name: String, available: String },

    /// App name would not stay inside the state directory
    #[error("Invalid app name '{name}': expected a single directory name")]
    InvalidAppName { name: String },

    /// Delegated process or git operation failed
    #[error("{tool} failed: {failure}")]
    ExternalTool { tool: String, failure: ToolFailure },

    /// Registry is empty, so there is nothing to act on
    #[error("No modules configured")]
    NoModulesConfigured,

    /// The state or installation directory could not be created
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize '{path}': {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Home directory could not be determined
    #[error("Could not determine home directory")]
    NoHomeDir,
}

pub type Result<T, E = ZelError> = std::result::Result<T, E>;
