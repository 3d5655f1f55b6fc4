use std::path::{Path, PathBuf};

use crate::error::{Result, ZelError};

#[cfg(windows)]
const STATE_SUBDIR: &str = "AppData/Local/zel/state";
#[cfg(not(windows))]
const STATE_SUBDIR: &str = ".local/state/zel";

#[cfg(windows)]
const INSTALL_SUBDIR: &str = "AppData/Local/zel";
#[cfg(not(windows))]
const INSTALL_SUBDIR: &str = ".local/share/zel";

/// Get the home directory
///
/// This is the only piece of ambient process state the state directory
/// depends on.
pub fn home_dir() -> Result<PathBuf> {
    directories::BaseDirs::new()
        .map(|bd| bd.home_dir().to_path_buf())
        .ok_or(ZelError::NoHomeDir)
}

/// Shared state directory for all zel tools under `home`
///
/// Returns `~/.local/state/zel` (`~/AppData/Local/zel/state` on Windows)
pub fn state_dir_in(home: &Path) -> PathBuf {
    home.join(STATE_SUBDIR)
}

/// Default installation directory under `home`
///
/// Returns `~/.local/share/zel` (`~/AppData/Local/zel` on Windows)
pub fn default_install_dir_in(home: &Path) -> PathBuf {
    home.join(INSTALL_SUBDIR)
}

/// Expand a leading `~` against `home`
pub fn expand_tilde(value: &str, home: &Path) -> PathBuf {
    let home = home.to_string_lossy().into_owned();
    let expanded = shellexpand::tilde_with_context(value, || Some(home.as_str()));
    PathBuf::from(expanded.into_owned())
}

/// Create `dir` and its parents, mapping failure to the fatal error kind
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| ZelError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}
