use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, ZelError};
use crate::layout::{Layout, ZelPath};
use crate::util::json::{read_json, write_json_atomic};

/// Key older releases stored inside paths.json
const LEGACY_KEY: &str = "install_dir";

/// Persisted choice of a non-default installation directory (`install.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationRecord {
    pub install_dir: PathBuf,
}

impl InstallationRecord {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
        }
    }

    /// Load the record, treating unreadable or corrupt files as absent
    pub fn load(layout: &Layout) -> Option<Self> {
        let path = layout.path(ZelPath::InstallRecord);
        tolerant_read::<Self>(&path).filter(|record| !record.install_dir.as_os_str().is_empty())
    }

    pub fn save(&self, layout: &Layout) -> Result<()> {
        write_json_atomic(&layout.path(ZelPath::InstallRecord), self)
    }

    /// Remove the record so the default location applies again
    pub fn clear(layout: &Layout) -> Result<bool> {
        let path = layout.path(ZelPath::InstallRecord);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ZelError::Io { path, source }),
        }
    }
}

/// Resolve the installation directory.
///
/// Order: `install.json`, then the legacy `install_dir` key in `paths.json`,
/// then the platform default. Never fails.
pub fn resolve_install_dir(layout: &Layout) -> PathBuf {
    if let Some(record) = InstallationRecord::load(layout) {
        debug!("Using recorded install dir {:?}", record.install_dir);
        return record.install_dir;
    }

    if let Some(dir) = legacy_install_dir(layout) {
        debug!("Using legacy install dir {:?} from paths.json", dir);
        return dir;
    }

    layout.path(ZelPath::DefaultInstallDir)
}

fn legacy_install_dir(layout: &Layout) -> Option<PathBuf> {
    let paths = tolerant_read::<Map<String, Value>>(&layout.path(ZelPath::PathsFile))?;
    paths
        .get(LEGACY_KEY)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn tolerant_read<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    match read_json(path) {
        Ok(value) => value,
        Err(err) => {
            warn!("{}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout() -> (TempDir, Layout) {
        let temp = TempDir::new().unwrap();
        let layout = Layout::from_home(temp.path());
        (temp, layout)
    }

    fn write_state(layout: &Layout, which: ZelPath, contents: &str) {
        let path = layout.path(which);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_default_when_absent() {
        let (_temp, layout) = layout();
        assert_eq!(
            resolve_install_dir(&layout),
            layout.path(ZelPath::DefaultInstallDir)
        );
    }

    #[test]
    fn test_recorded_dir_wins() {
        let (temp, layout) = layout();
        let dev = temp.path().join("dev/zel");
        InstallationRecord::new(&dev).save(&layout).unwrap();

        assert_eq!(resolve_install_dir(&layout), dev);
        assert_eq!(
            InstallationRecord::load(&layout),
            Some(InstallationRecord::new(dev))
        );
    }

    #[test]
    fn test_corrupt_record_falls_back_to_default() {
        let (_temp, layout) = layout();
        write_state(&layout, ZelPath::InstallRecord, "{\"install_dir\": ");
        assert_eq!(
            resolve_install_dir(&layout),
            layout.path(ZelPath::DefaultInstallDir)
        );
    }

    #[test]
    fn test_record_without_field_falls_back() {
        let (_temp, layout) = layout();
        write_state(&layout, ZelPath::InstallRecord, "{\"other\": 1}");
        assert!(InstallationRecord::load(&layout).is_none());
    }

    #[test]
    fn test_legacy_paths_key_is_honoured() {
        let (_temp, layout) = layout();
        write_state(
            &layout,
            ZelPath::PathsFile,
            r#"{"vault": "/mnt/Vault", "install_dir": "/opt/zel"}"#,
        );
        assert_eq!(resolve_install_dir(&layout), PathBuf::from("/opt/zel"));
    }

    #[test]
    fn test_record_wins_over_legacy_key() {
        let (_temp, layout) = layout();
        write_state(&layout, ZelPath::PathsFile, r#"{"install_dir": "/opt/legacy"}"#);
        InstallationRecord::new("/opt/record").save(&layout).unwrap();
        assert_eq!(resolve_install_dir(&layout), PathBuf::from("/opt/record"));
    }

    #[test]
    fn test_clear() {
        let (_temp, layout) = layout();
        assert!(!InstallationRecord::clear(&layout).unwrap());

        InstallationRecord::new("/opt/zel").save(&layout).unwrap();
        assert!(InstallationRecord::clear(&layout).unwrap());
        assert_eq!(
            resolve_install_dir(&layout),
            layout.path(ZelPath::DefaultInstallDir)
        );
    }
}
