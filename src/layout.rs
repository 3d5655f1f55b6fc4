use std::path::{Component, Path, PathBuf};

use crate::error::{Result, ZelError};
use crate::util::dirs;

/// Well-known locations derived from the user's home directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZelPath {
    /// Shared state directory: ~/.local/state/zel
    StateDir,
    /// Path store: state/paths.json
    PathsFile,
    /// Installation record: state/install.json
    InstallRecord,
    /// Global config: state/config.json
    GlobalConfig,
    /// Fallback installation directory: ~/.local/share/zel
    DefaultInstallDir,
}

/// Layout - resolved locations for all persisted zel state
///
/// Everything is a pure function of the home directory, so the state
/// directory stays stable for the life of an installation. Nothing here
/// touches the filesystem; callers create directories before writing.
#[derive(Debug, Clone)]
pub struct Layout {
    home: PathBuf,
    state_dir: PathBuf,
}

impl Layout {
    /// Resolve the layout for the current user
    pub fn discover() -> Result<Self> {
        Ok(Self::from_home(dirs::home_dir()?))
    }

    /// Build a layout rooted at an explicit home directory
    pub fn from_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let state_dir = dirs::state_dir_in(&home);
        Self { home, state_dir }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Resolve the shared state directory
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Get path for a specific zel location
    pub fn path(&self, path_type: ZelPath) -> PathBuf {
        match path_type {
            ZelPath::StateDir => self.state_dir.clone(),
            ZelPath::PathsFile => self.state_dir.join("paths.json"),
            ZelPath::InstallRecord => self.state_dir.join("install.json"),
            ZelPath::GlobalConfig => self.state_dir.join("config.json"),
            ZelPath::DefaultInstallDir => dirs::default_install_dir_in(&self.home),
        }
    }

    /// Private data directory for one app: state/<app>
    ///
    /// `app_name` must be a single plain path component.
    pub fn app_dir(&self, app_name: &str) -> Result<PathBuf> {
        let mut components = Path::new(app_name).components();
        let plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !plain || app_name.contains(['/', '\\']) {
            return Err(ZelError::InvalidAppName {
                name: app_name.to_string(),
            });
        }
        Ok(self.state_dir.join(app_name))
    }

    /// Expand `~` in a user-supplied path against this layout's home
    pub fn expand(&self, value: &str) -> PathBuf {
        dirs::expand_tilde(value, &self.home)
    }
}
