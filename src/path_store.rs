use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, ZelError};
use crate::layout::{Layout, ZelPath};
use crate::util::json::{read_json, write_json_atomic};

/// Options for [`PathStore::get`]
///
/// Empty strings count as absent for both `override_value` and `default`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLookup<'a> {
    /// Value supplied on the command line; wins over the stored value
    pub override_value: Option<&'a str>,
    /// Persist `override_value` before returning it
    pub save_override: bool,
    /// Returned when nothing is stored; never persisted
    pub default: Option<&'a str>,
}

impl<'a> PathLookup<'a> {
    pub fn with_override(value: &'a str, save: bool) -> Self {
        Self {
            override_value: Some(value),
            save_override: save,
            default: None,
        }
    }

    pub fn with_default(value: &'a str) -> Self {
        Self {
            default: Some(value),
            ..Self::default()
        }
    }
}

/// Flat key → path store persisted as `paths.json` in the state directory
#[derive(Debug, Clone)]
pub struct PathStore {
    file: PathBuf,
}

impl PathStore {
    pub fn new(layout: &Layout) -> Self {
        Self::at(layout.path(ZelPath::PathsFile))
    }

    pub fn at(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Resolve a path key: override, then stored value, then default.
    pub fn get(&self, key: &str, lookup: PathLookup<'_>) -> Result<String> {
        if let Some(value) = non_empty(lookup.override_value) {
            if lookup.save_override {
                self.set(key, value)?;
            }
            return Ok(value.to_string());
        }

        if let Some(value) = self.entries()?.remove(key) {
            return Ok(value);
        }

        non_empty(lookup.default)
            .map(str::to_string)
            .ok_or_else(|| ZelError::PathNotFound {
                key: key.to_string(),
            })
    }

    /// Store `value` under `key`, rewriting the whole file.
    ///
    /// Other entries are written back unchanged, including ones `entries`
    /// skips.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut raw = self.load_raw()?;
        raw.insert(key.to_string(), Value::String(value.to_string()));
        write_json_atomic(&self.file, &raw)?;
        debug!("Set path {} = {} in {:?}", key, value, self.file);
        Ok(())
    }

    /// All stored string entries; empty when the file is missing or corrupt
    pub fn entries(&self) -> Result<BTreeMap<String, String>> {
        let entries = self
            .load_raw()?
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(path) => Some((key, path)),
                other => {
                    warn!("Skipping '{}' in {:?}: expected a string, got {}", key, self.file, other);
                    None
                }
            })
            .collect();
        Ok(entries)
    }

    fn load_raw(&self) -> Result<Map<String, Value>> {
        match read_json::<Value>(&self.file)? {
            Some(Value::Object(map)) => Ok(map),
            Some(_) => {
                warn!("Ignoring {:?}: top level is not an object", self.file);
                Ok(Map::new())
            }
            None => Ok(Map::new()),
        }
    }

    pub fn exists(&self) -> bool {
        self.file.exists()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
