use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::{Result, ZelError};
use crate::util::dirs::ensure_dir;

/// Read a JSON state file.
///
/// A missing file yields `Ok(None)`. A file that exists but does not parse as
/// `T` is treated the same way after a warning.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ZelError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!("Ignoring corrupt state file {:?}: {}", path, err);
            Ok(None)
        }
    }
}

/// Write `value` as pretty JSON, replacing `path` atomically.
///
/// The document goes to a temporary file in the same directory which is then
/// renamed over the target, so readers never observe a truncated file.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(parent)?;

    let mut contents = serde_json::to_string_pretty(value).map_err(|source| {
        ZelError::Serialize {
            path: path.to_path_buf(),
            source,
        }
    })?;
    contents.push('\n');

    let io_err = |source: io::Error| ZelError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(parent).map_err(io_err)?;
    file.write_all(contents.as_bytes()).map_err(io_err)?;
    file.as_file().sync_all().map_err(io_err)?;
    file.persist(path).map_err(|err| io_err(err.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_is_none() {
        let temp = TempDir::new().unwrap();
        let value: Option<BTreeMap<String, String>> =
            read_json(&temp.path().join("absent.json")).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_read_corrupt_is_none() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("paths.json");
        fs::write(&path, "{\"vault\": ").unwrap();

        let value: Option<BTreeMap<String, String>> = read_json(&path).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_write_creates_parent_and_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state/zel/paths.json");

        let mut map = BTreeMap::new();
        map.insert("vault".to_string(), "/mnt/Vault".to_string());
        write_json_atomic(&path, &map).unwrap();

        let read: BTreeMap<String, String> = read_json(&path).unwrap().unwrap();
        assert_eq!(read, map);

        let entries: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("paths.json")]);
    }

    #[test]
    fn test_write_replaces_existing_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "garbage that is much longer than the replacement").unwrap();

        write_json_atomic(&path, &serde_json::json!({"a": 1})).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with('{'));
        assert!(contents.ends_with("}\n"));
    }
}
