// Public API
pub mod cli;
pub mod commands;
pub mod ui;

// Core domain types
mod config;
mod environment;
mod error;
mod installer;
mod integration;
mod layout;
mod path_registry;
mod path_store;
mod registry;
mod util;

// Re-export main types
pub use config::{parse_value, ConfigStore, PYTHON_KEY};
pub use environment::{add_to_path, PathUpdate, Shell};
pub use error::{Result, ToolFailure, ZelError};
pub use installer::{
    observe, resolve_install_dir, CloneOutcome, Git2Vcs, InstallReport, InstallationRecord,
    Installer, PythonVenv, RuntimeEnv, UpdateReport, Vcs,
};
pub use integration::{app_data_dir, installed_apps, installed_apps_in, resolve_path};
pub use layout::{Layout, ZelPath};
pub use path_registry::{available_keys, describe, suggest, PathKeyDescriptor};
pub use path_store::{PathLookup, PathStore};
pub use registry::{ModuleDescriptor, ModuleRegistry};
