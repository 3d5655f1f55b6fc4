//! The managed Python environment that modules are installed into.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::ToolFailure;

#[cfg(windows)]
const BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
const BIN_DIR: &str = "bin";

#[cfg(windows)]
const PIP: &str = "pip.exe";
#[cfg(not(windows))]
const PIP: &str = "pip";

#[cfg(windows)]
pub const DEFAULT_PYTHON: &str = "python";
#[cfg(not(windows))]
pub const DEFAULT_PYTHON: &str = "python3";

/// Environment directory used by development checkouts
pub const DEV_ENV_DIR: &str = "temp_venv";
pub const ENV_DIR: &str = "venv";

/// Environment location under `install_dir`; a development environment wins
/// when present.
pub fn env_dir(install_dir: &Path) -> PathBuf {
    let dev = install_dir.join(DEV_ENV_DIR);
    if dev.is_dir() {
        dev
    } else {
        install_dir.join(ENV_DIR)
    }
}

/// Directory holding the environment's executables
pub fn bin_dir(env_dir: &Path) -> PathBuf {
    env_dir.join(BIN_DIR)
}

/// Creates environments and installs module sources into them.
pub trait RuntimeEnv {
    fn create(&self, env_dir: &Path) -> Result<(), ToolFailure>;

    /// Editable (development mode) install of the project at `source`
    fn install_editable(&self, env_dir: &Path, source: &Path) -> Result<(), ToolFailure>;
}

/// `python -m venv` plus `pip install -e`
#[derive(Debug, Clone)]
pub struct PythonVenv {
    python: String,
}

impl Default for PythonVenv {
    fn default() -> Self {
        Self::new(DEFAULT_PYTHON)
    }
}

impl PythonVenv {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }
}

impl RuntimeEnv for PythonVenv {
    fn create(&self, env_dir: &Path) -> Result<(), ToolFailure> {
        let mut command = Command::new(&self.python);
        command.arg("-m").arg("venv").arg(env_dir);
        run(command)
    }

    fn install_editable(&self, env_dir: &Path, source: &Path) -> Result<(), ToolFailure> {
        let mut command = Command::new(bin_dir(env_dir).join(PIP));
        command.arg("install").arg("-e").arg(source);
        run(command)
    }
}

/// Run to completion, capturing stderr as the failure diagnostic.
pub(crate) fn run(mut command: Command) -> Result<(), ToolFailure> {
    debug!("Running {:?}", command);
    let output = command.output().map_err(|err| {
        ToolFailure::new(
            None,
            format!(
                "failed to run {}: {}",
                command.get_program().to_string_lossy(),
                err
            ),
        )
    })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(ToolFailure::new(
            output.status.code(),
            String::from_utf8_lossy(&output.stderr),
        ))
    }
}
