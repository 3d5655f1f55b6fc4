//! Helpers for downstream zel tools.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::installer::{observe, resolve_install_dir};
use crate::layout::Layout;
use crate::path_store::{PathLookup, PathStore};
use crate::registry::ModuleRegistry;

/// Registry modules whose directory exists under the resolved install dir
pub fn installed_apps(layout: &Layout, registry: &ModuleRegistry) -> Vec<String> {
    installed_apps_in(&resolve_install_dir(layout), registry)
}

pub fn installed_apps_in(install_dir: &Path, registry: &ModuleRegistry) -> Vec<String> {
    observe(install_dir, registry)
}

/// Private data directory for an app. Not created here.
pub fn app_data_dir(layout: &Layout, app_name: &str) -> Result<PathBuf> {
    layout.app_dir(app_name)
}

/// Resolve a path key to a filesystem path, expanding `~`
pub fn resolve_path(layout: &Layout, key: &str, lookup: PathLookup<'_>) -> Result<PathBuf> {
    let value = PathStore::new(layout).get(key, lookup)?;
    Ok(layout.expand(&value))
}
