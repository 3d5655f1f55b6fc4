use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Module manifest shipped inside the binary
const BUNDLED_MANIFEST: &str = include_str!("../data/zel-modules.json");

/// One installable zel tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Unique identifier; also the directory name under the install dir
    pub name: String,
    pub description: String,
    /// Remote the module is cloned from
    pub source_url: String,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    modules: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawModule {
    #[serde(default)]
    description: String,
    git_url: String,
}

/// Known modules, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRegistry {
    modules: Vec<ModuleDescriptor>,
}

impl ModuleRegistry {
    /// Registry parsed from the bundled manifest, loaded once per process
    pub fn bundled() -> &'static ModuleRegistry {
        static BUNDLED: OnceLock<ModuleRegistry> = OnceLock::new();
        BUNDLED.get_or_init(|| Self::from_json(BUNDLED_MANIFEST))
    }

    /// Load a manifest from disk. A missing or unreadable file yields an empty
    /// registry and a warning.
    pub fn from_file(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents),
            Err(err) => {
                warn!("Failed to load module metadata from {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    /// Parse a manifest document. Unparsable input yields an empty registry;
    /// individual malformed entries are skipped.
    pub fn from_json(contents: &str) -> Self {
        let raw: RawManifest = match serde_json::from_str(contents) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Failed to parse module metadata: {}", err);
                return Self::default();
            }
        };

        let mut modules = Vec::with_capacity(raw.modules.len());
        for (name, value) in raw.modules {
            match serde_json::from_value::<RawModule>(value) {
                Ok(module) => modules.push(ModuleDescriptor {
                    name,
                    description: module.description,
                    source_url: module.git_url,
                }),
                Err(err) => warn!("Skipping module '{}' in manifest: {}", name, err),
            }
        }

        debug!("Loaded {} module(s) from manifest", modules.len());
        Self { modules }
    }

    pub fn from_modules(modules: Vec<ModuleDescriptor>) -> Self {
        Self { modules }
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn info(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn validate(&self, name: &str) -> bool {
        self.info(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Sorted, comma separated names for error messages
    pub fn available(&self) -> String {
        let mut names = self.names();
        names.sort_unstable();
        names.join(", ")
    }
}
