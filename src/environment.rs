use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, ZelError};
use crate::util::dirs::ensure_dir;

#[cfg_attr(windows, allow(dead_code))]
const PROFILE_HEADER: &str = "# Zel tools";

/// Shell whose profile receives the managed environment's bin directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Zsh,
    Bash,
    Fish,
}

impl Shell {
    /// Classify a `$SHELL` value; anything unrecognised is treated as bash.
    pub fn from_shell_path(shell: &str) -> Self {
        if shell.contains("zsh") {
            Shell::Zsh
        } else if shell.contains("fish") {
            Shell::Fish
        } else {
            Shell::Bash
        }
    }

    /// Detect the current shell from `$SHELL`
    pub fn detect() -> Self {
        Self::from_shell_path(&env::var("SHELL").unwrap_or_default())
    }

    /// Profile file under `home` that this shell reads on startup
    pub fn profile_file(self, home: &Path) -> PathBuf {
        match self {
            Shell::Zsh => home.join(".zshrc"),
            Shell::Bash => home.join(".bashrc"),
            Shell::Fish => home.join(".config/fish/config.fish"),
        }
    }

    /// Line that prepends `bin_path` to PATH
    pub fn path_line(self, bin_path: &Path) -> String {
        match self {
            Shell::Zsh | Shell::Bash => format!("export PATH=\"{}:$PATH\"", bin_path.display()),
            Shell::Fish => format!("set -gx PATH {} $PATH", bin_path.display()),
        }
    }
}

/// What happened when making a bin directory discoverable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathUpdate {
    /// Line appended to this profile file
    Added(PathBuf),
    /// Profile already mentions the bin directory
    AlreadyPresent(PathBuf),
    /// No profile file to edit; the user has to add this directory by hand
    Manual(PathBuf),
}

/// Make `bin_path` discoverable by future shells.
#[cfg(not(windows))]
pub fn add_to_path(home: &Path, shell: Shell, bin_path: &Path) -> Result<PathUpdate> {
    let profile = shell.profile_file(home);
    if append_path_line(&profile, shell, bin_path)? {
        Ok(PathUpdate::Added(profile))
    } else {
        Ok(PathUpdate::AlreadyPresent(profile))
    }
}

/// Windows keeps PATH in the registry, so the user adds it manually.
#[cfg(windows)]
pub fn add_to_path(_home: &Path, _shell: Shell, bin_path: &Path) -> Result<PathUpdate> {
    Ok(PathUpdate::Manual(bin_path.to_path_buf()))
}

/// Append the PATH line to a profile file (idempotent)
///
/// Returns `false` without writing when the bin path already occurs in the file.
#[cfg_attr(windows, allow(dead_code))]
fn append_path_line(profile: &Path, shell: Shell, bin_path: &Path) -> Result<bool> {
    let io_err = |source| ZelError::Io {
        path: profile.to_path_buf(),
        source,
    };

    let existing_content = if profile.exists() {
        fs::read_to_string(profile).map_err(io_err)?
    } else {
        String::new()
    };

    if existing_content.contains(&bin_path.to_string_lossy().into_owned()) {
        debug!("{:?} already references {:?}", profile, bin_path);
        return Ok(false);
    }

    if let Some(parent) = profile.parent() {
        ensure_dir(parent)?;
    }

    let separator = if existing_content.is_empty() || existing_content.ends_with('\n') {
        ""
    } else {
        "\n"
    };
    let new_content = format!(
        "{existing_content}{separator}\n{PROFILE_HEADER}\n{}\n",
        shell.path_line(bin_path)
    );

    fs::write(profile, new_content).map_err(io_err)?;
    debug!("Added {:?} to PATH in {:?}", bin_path, profile);
    Ok(true)
}
