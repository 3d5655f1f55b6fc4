use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::warn;

use crate::error::Result;
use crate::layout::{Layout, ZelPath};
use crate::util::json::{read_json, write_json_atomic};

const CONFIG_FILE: &str = "config.json";

/// Global config key naming the interpreter used to create the managed environment
pub const PYTHON_KEY: &str = "python";

/// JSON settings for zel itself (global) or for one app (scoped)
#[derive(Debug, Clone)]
pub struct ConfigStore {
    layout: Layout,
}

impl ConfigStore {
    pub fn new(layout: &Layout) -> Self {
        Self {
            layout: layout.clone(),
        }
    }

    /// File backing the global config (`None`) or an app's config
    pub fn file(&self, app_name: Option<&str>) -> Result<PathBuf> {
        match app_name {
            Some(app) => Ok(self.layout.app_dir(app)?.join(CONFIG_FILE)),
            None => Ok(self.layout.path(ZelPath::GlobalConfig)),
        }
    }

    /// Load a config mapping. Missing or unreadable JSON yields an empty mapping.
    pub fn load(&self, app_name: Option<&str>) -> Result<Map<String, Value>> {
        let path = self.file(app_name)?;
        match read_json::<Value>(&path)? {
            Some(Value::Object(map)) => Ok(map),
            Some(_) => {
                warn!("Ignoring config {:?}: top level is not an object", path);
                Ok(Map::new())
            }
            None => Ok(Map::new()),
        }
    }

    /// Overwrite the config file with `config`.
    pub fn save(&self, config: &Map<String, Value>, app_name: Option<&str>) -> Result<()> {
        write_json_atomic(&self.file(app_name)?, config)
    }

    pub fn get(&self, key: &str, app_name: Option<&str>) -> Result<Option<Value>> {
        Ok(self.load(app_name)?.remove(key))
    }

    /// Set one key, keeping the rest of the mapping.
    pub fn set(&self, key: &str, value: Value, app_name: Option<&str>) -> Result<()> {
        let mut config = self.load(app_name)?;
        config.insert(key.to_string(), value);
        self.save(&config, app_name)
    }

    /// Interpreter configured for environment creation, if any
    pub fn python(&self) -> Result<Option<String>> {
        Ok(self
            .get(PYTHON_KEY, None)?
            .and_then(|value| value.as_str().map(str::to_string))
            .filter(|value| !value.trim().is_empty()))
    }
}

/// Parse a CLI-supplied value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
