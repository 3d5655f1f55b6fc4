//! Reconciles the module registry against the installation directory.
//!
//! A module's state is never persisted. It is re-derived on every call by
//! probing `<install_dir>/<name>`: absent means not cloned, present means
//! cloned (and installable). Cloning, installing and updating move modules
//! forward from whatever is observed on disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::environment::{add_to_path, PathUpdate, Shell};
use crate::error::{Result, ToolFailure, ZelError};
use crate::layout::Layout;
use crate::registry::ModuleRegistry;
use crate::util::dirs::ensure_dir;

mod git;
mod record;
mod venv;

pub use git::{Git2Vcs, Vcs};
pub use record::{resolve_install_dir, InstallationRecord};
pub use venv::{bin_dir, env_dir, PythonVenv, RuntimeEnv, DEFAULT_PYTHON};

/// Names of registry modules whose directory exists under `install_dir`,
/// in registry order. Computed fresh on every call.
pub fn observe(install_dir: &Path, registry: &ModuleRegistry) -> Vec<String> {
    registry
        .iter()
        .filter(|module| install_dir.join(&module.name).exists())
        .map(|module| module.name.clone())
        .collect()
}

/// Result of a successful clone request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    Cloned { name: String, path: PathBuf },
    AlreadyExists { name: String, path: PathBuf },
}

impl fmt::Display for CloneOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloneOutcome::Cloned { name, .. } => write!(f, "Successfully cloned {name}"),
            CloneOutcome::AlreadyExists { name, path } => {
                write!(f, "Module '{name}' already exists at {}", path.display())
            }
        }
    }
}

/// Outcome of installing every cloned module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub env_dir: PathBuf,
    /// Whether the environment had to be created on this run
    pub created_env: bool,
    pub installed: Vec<String>,
    /// Registry modules with no directory on disk
    pub skipped: Vec<String>,
    pub failed: Vec<(String, ToolFailure)>,
    pub path_update: PathUpdate,
}

impl InstallReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of pulling every cloned module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub updated: Vec<String>,
    pub failed: Vec<(String, ToolFailure)>,
}

impl UpdateReport {
    /// Nothing was cloned, so nothing was attempted
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && self.failed.is_empty()
    }
}

/// Drives clone / install / update against an installation directory
pub struct Installer {
    home: PathBuf,
    install_dir: PathBuf,
    shell: Shell,
    vcs: Box<dyn Vcs>,
    runtime: Box<dyn RuntimeEnv>,
}

impl fmt::Debug for Installer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Installer")
            .field("home", &self.home)
            .field("install_dir", &self.install_dir)
            .field("shell", &self.shell)
            .finish_non_exhaustive()
    }
}

impl Installer {
    /// Installer for the recorded (or default) install dir, using git and
    /// `python` for the environment.
    pub fn new(layout: &Layout, python: &str) -> Self {
        Self::with_backends(
            layout,
            resolve_install_dir(layout),
            Shell::detect(),
            Box::new(Git2Vcs),
            Box::new(PythonVenv::new(python)),
        )
    }

    pub fn with_backends(
        layout: &Layout,
        install_dir: PathBuf,
        shell: Shell,
        vcs: Box<dyn Vcs>,
        runtime: Box<dyn RuntimeEnv>,
    ) -> Self {
        Self {
            home: layout.home().to_path_buf(),
            install_dir,
            shell,
            vcs,
            runtime,
        }
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn module_dir(&self, name: &str) -> PathBuf {
        self.install_dir.join(name)
    }

    /// Managed environment location (`temp_venv` in development mode)
    pub fn env_dir(&self) -> PathBuf {
        env_dir(&self.install_dir)
    }

    /// Clone a registry module by name
    pub fn clone_registered(&self, registry: &ModuleRegistry, name: &str) -> Result<CloneOutcome> {
        let module = registry.info(name).ok_or_else(|| ZelError::ModuleNotFound {
            name: name.to_string(),
            available: registry.available(),
        })?;
        self.clone_module(&module.name, &module.source_url)
    }

    /// Clone `source_url` into `<install_dir>/<name>`.
    ///
    /// An existing directory is reported as `AlreadyExists` without touching
    /// the version-control backend. Clone failures come back as
    /// `ZelError::ExternalTool`; only failing to create the install dir is
    /// fatal in the I/O sense.
    pub fn clone_module(&self, name: &str, source_url: &str) -> Result<CloneOutcome> {
        ensure_dir(&self.install_dir)?;

        let target = self.module_dir(name);
        if target.exists() {
            debug!("{} already present at {:?}", name, target);
            return Ok(CloneOutcome::AlreadyExists {
                name: name.to_string(),
                path: target,
            });
        }

        info!("Cloning {} from {}", name, source_url);
        match self.vcs.clone_repo(source_url, &target) {
            Ok(()) => Ok(CloneOutcome::Cloned {
                name: name.to_string(),
                path: target,
            }),
            Err(failure) => {
                // A half-written checkout would read as "cloned" next time.
                if target.exists() {
                    if let Err(err) = fs::remove_dir_all(&target) {
                        warn!("Failed to remove partial clone {:?}: {}", target, err);
                    }
                }
                Err(ZelError::ExternalTool {
                    tool: format!("git clone {name}"),
                    failure,
                })
            }
        }
    }

    /// Install every cloned registry module into the managed environment,
    /// creating it first if needed, then put its bin directory on PATH.
    ///
    /// Per-module install failures are collected in the report.
    pub fn install_all(&self, registry: &ModuleRegistry) -> Result<InstallReport> {
        if registry.is_empty() {
            return Err(ZelError::NoModulesConfigured);
        }

        ensure_dir(&self.install_dir)?;

        let env_dir = self.env_dir();
        let created_env = if env_dir.exists() {
            debug!("Using existing environment at {:?}", env_dir);
            false
        } else {
            info!("Creating zel environment at {:?}", env_dir);
            self.runtime
                .create(&env_dir)
                .map_err(|failure| ZelError::ExternalTool {
                    tool: "environment creation".to_string(),
                    failure,
                })?;
            true
        };

        let mut installed = Vec::new();
        let mut skipped = Vec::new();
        let mut failed = Vec::new();

        for module in registry.iter() {
            let source = self.module_dir(&module.name);
            if !source.exists() {
                debug!("Skipping {} (not found at {:?})", module.name, source);
                skipped.push(module.name.clone());
                continue;
            }

            info!("Installing {}", module.name);
            match self.runtime.install_editable(&env_dir, &source) {
                Ok(()) => installed.push(module.name.clone()),
                Err(failure) => {
                    warn!("Failed to install {}: {}", module.name, failure);
                    failed.push((module.name.clone(), failure));
                }
            }
        }

        let path_update = add_to_path(&self.home, self.shell, &bin_dir(&env_dir))?;

        Ok(InstallReport {
            env_dir,
            created_env,
            installed,
            skipped,
            failed,
            path_update,
        })
    }

    /// Pull every cloned registry module. One module failing never stops the rest.
    pub fn update_all(&self, registry: &ModuleRegistry) -> Result<UpdateReport> {
        if registry.is_empty() {
            return Err(ZelError::NoModulesConfigured);
        }

        let mut report = UpdateReport::default();
        for name in observe(&self.install_dir, registry) {
            match self.vcs.pull(&self.module_dir(&name)) {
                Ok(()) => {
                    info!("Updated {}", name);
                    report.updated.push(name);
                }
                Err(failure) => {
                    warn!("Failed to update {}: {}", name, failure);
                    report.failed.push((name, failure));
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ModuleDescriptor;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Calls {
        clones: Vec<String>,
        pulls: Vec<PathBuf>,
        creates: Vec<PathBuf>,
        installs: Vec<PathBuf>,
    }

    #[derive(Clone, Default)]
    struct FakeBackend {
        calls: Rc<RefCell<Calls>>,
        failing: Rc<HashSet<String>>,
    }

    impl FakeBackend {
        fn failing(names: &[&str]) -> Self {
            Self {
                failing: Rc::new(names.iter().map(|n| n.to_string()).collect()),
                ..Self::default()
            }
        }

        fn fails_for(&self, path: &Path) -> bool {
            let name = path.file_name().unwrap().to_string_lossy();
            self.failing.contains(name.as_ref())
        }
    }

    impl Vcs for FakeBackend {
        fn clone_repo(&self, url: &str, target: &Path) -> Result<(), ToolFailure> {
            self.calls.borrow_mut().clones.push(url.to_string());
            fs::create_dir_all(target).unwrap();
            if self.fails_for(target) {
                return Err(ToolFailure::new(Some(128), "fatal: repository not found"));
            }
            Ok(())
        }

        fn pull(&self, repo_dir: &Path) -> Result<(), ToolFailure> {
            self.calls.borrow_mut().pulls.push(repo_dir.to_path_buf());
            if self.fails_for(repo_dir) {
                return Err(ToolFailure::new(Some(1), "fatal: not a git repository"));
            }
            Ok(())
        }
    }

    impl RuntimeEnv for FakeBackend {
        fn create(&self, env_dir: &Path) -> Result<(), ToolFailure> {
            self.calls.borrow_mut().creates.push(env_dir.to_path_buf());
            fs::create_dir_all(bin_dir(env_dir)).unwrap();
            Ok(())
        }

        fn install_editable(&self, _env_dir: &Path, source: &Path) -> Result<(), ToolFailure> {
            self.calls.borrow_mut().installs.push(source.to_path_buf());
            if self.fails_for(source) {
                return Err(ToolFailure::new(Some(1), "error: no setup.py"));
            }
            Ok(())
        }
    }

    fn registry(names: &[&str]) -> ModuleRegistry {
        ModuleRegistry::from_modules(
            names
                .iter()
                .map(|name| ModuleDescriptor {
                    name: name.to_string(),
                    description: format!("{name} tool"),
                    source_url: format!("https://example/{name}.git"),
                })
                .collect(),
        )
    }

    fn installer(temp: &TempDir, backend: &FakeBackend) -> Installer {
        let layout = Layout::from_home(temp.path());
        Installer::with_backends(
            &layout,
            temp.path().join("install"),
            Shell::Bash,
            Box::new(backend.clone()),
            Box::new(backend.clone()),
        )
    }

    #[test]
    fn test_observe_reflects_disk() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&["zeljournal", "zelbudget", "zeltimer"]);
        assert!(observe(temp.path(), &registry).is_empty());

        fs::create_dir_all(temp.path().join("zeltimer")).unwrap();
        fs::create_dir_all(temp.path().join("zeljournal")).unwrap();
        fs::create_dir_all(temp.path().join("unrelated")).unwrap();
        assert_eq!(observe(temp.path(), &registry), vec!["zeljournal", "zeltimer"]);

        fs::remove_dir_all(temp.path().join("zeltimer")).unwrap();
        assert_eq!(observe(temp.path(), &registry), vec!["zeljournal"]);
    }

    #[test]
    fn test_clone_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let backend = FakeBackend::default();
        let installer = installer(&temp, &backend);

        let first = installer
            .clone_module("zeljournal", "https://example/zeljournal.git")
            .unwrap();
        assert!(matches!(first, CloneOutcome::Cloned { .. }));
        assert!(installer.module_dir("zeljournal").exists());

        let second = installer
            .clone_module("zeljournal", "https://example/zeljournal.git")
            .unwrap();
        assert!(matches!(second, CloneOutcome::AlreadyExists { .. }));
        assert!(second.to_string().contains("already exists"));

        assert_eq!(backend.calls.borrow().clones.len(), 1);
    }

    #[test]
    fn test_clone_failure_is_data_and_cleans_up() {
        let temp = TempDir::new().unwrap();
        let backend = FakeBackend::failing(&["zelbudget"]);
        let installer = installer(&temp, &backend);

        let err = installer
            .clone_module("zelbudget", "https://example/zelbudget.git")
            .unwrap_err();
        match err {
            ZelError::ExternalTool { failure, .. } => {
                assert_eq!(failure.code, Some(128));
                assert!(failure.diagnostic.contains("repository not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!installer.module_dir("zelbudget").exists());
        assert!(installer.install_dir().exists());
    }

    #[test]
    fn test_clone_registered_unknown_module() {
        let temp = TempDir::new().unwrap();
        let backend = FakeBackend::default();
        let installer = installer(&temp, &backend);

        let err = installer
            .clone_registered(&registry(&["zeltimer", "zeljournal"]), "zelnope")
            .unwrap_err();
        match err {
            ZelError::ModuleNotFound { name, available } => {
                assert_eq!(name, "zelnope");
                assert_eq!(available, "zeljournal, zeltimer");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(backend.calls.borrow().clones.is_empty());
    }

    #[test]
    fn test_clone_registered_uses_source_url() {
        let temp = TempDir::new().unwrap();
        let backend = FakeBackend::default();
        let installer = installer(&temp, &backend);

        installer
            .clone_registered(&registry(&["zeltimer"]), "zeltimer")
            .unwrap();
        assert_eq!(
            backend.calls.borrow().clones,
            vec!["https://example/zeltimer.git".to_string()]
        );
    }

    #[test]
    fn test_install_all_installs_only_cloned_modules() {
        let temp = TempDir::new().unwrap();
        let backend = FakeBackend::default();
        let installer = installer(&temp, &backend);
        let registry = registry(&["zeljournal", "zelbudget", "zeltimer"]);

        fs::create_dir_all(installer.module_dir("zeljournal")).unwrap();
        fs::create_dir_all(installer.module_dir("zeltimer")).unwrap();

        let report = installer.install_all(&registry).unwrap();
        assert!(report.is_success());
        assert!(report.created_env);
        assert_eq!(report.installed, vec!["zeljournal", "zeltimer"]);
        assert_eq!(report.skipped, vec!["zelbudget"]);
        assert_eq!(report.env_dir, installer.install_dir().join("venv"));
        assert!(matches!(report.path_update, PathUpdate::Added(_) | PathUpdate::Manual(_)));
    }

    #[test]
    fn test_install_all_reuses_environment() {
        let temp = TempDir::new().unwrap();
        let backend = FakeBackend::default();
        let installer = installer(&temp, &backend);
        let registry = registry(&["zeljournal"]);

        installer.install_all(&registry).unwrap();
        let second = installer.install_all(&registry).unwrap();

        assert!(!second.created_env);
        assert_eq!(backend.calls.borrow().creates.len(), 1);
        assert!(matches!(
            second.path_update,
            PathUpdate::AlreadyPresent(_) | PathUpdate::Manual(_)
        ));
    }

    #[test]
    fn test_install_all_uses_dev_environment() {
        let temp = TempDir::new().unwrap();
        let backend = FakeBackend::default();
        let installer = installer(&temp, &backend);
        fs::create_dir_all(installer.install_dir().join("temp_venv")).unwrap();

        let report = installer.install_all(&registry(&["zeljournal"])).unwrap();
        assert_eq!(report.env_dir, installer.install_dir().join("temp_venv"));
        assert!(!report.created_env);
        assert!(backend.calls.borrow().creates.is_empty());
    }

    #[test]
    fn test_install_all_collects_failures() {
        let temp = TempDir::new().unwrap();
        let backend = FakeBackend::failing(&["zelbudget"]);
        let installer = installer(&temp, &backend);
        let registry = registry(&["zelbudget", "zeltimer"]);
        fs::create_dir_all(installer.module_dir("zelbudget")).unwrap();
        fs::create_dir_all(installer.module_dir("zeltimer")).unwrap();

        let report = installer.install_all(&registry).unwrap();
        assert!(!report.is_success());
        assert_eq!(report.installed, vec!["zeltimer"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "zelbudget");
    }

    #[test]
    fn test_install_all_empty_registry() {
        let temp = TempDir::new().unwrap();
        let backend = FakeBackend::default();
        let installer = installer(&temp, &backend);

        let err = installer.install_all(&ModuleRegistry::default()).unwrap_err();
        assert!(matches!(err, ZelError::NoModulesConfigured));
        assert!(backend.calls.borrow().creates.is_empty());
    }

    #[test]
    fn test_update_all_isolates_failures() {
        let temp = TempDir::new().unwrap();
        let backend = FakeBackend::failing(&["zelmedia"]);
        let installer = installer(&temp, &backend);
        let registry = registry(&["zeljournal", "zelbudget", "zelmedia", "zeltimer"]);

        for name in ["zeljournal", "zelmedia", "zeltimer"] {
            fs::create_dir_all(installer.module_dir(name)).unwrap();
        }

        let report = installer.update_all(&registry).unwrap();
        assert_eq!(report.updated, vec!["zeljournal", "zeltimer"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "zelmedia");
        assert!(report.failed[0].1.diagnostic.contains("not a git repository"));
        assert_eq!(backend.calls.borrow().pulls.len(), 3);
    }

    #[test]
    fn test_update_all_nothing_cloned() {
        let temp = TempDir::new().unwrap();
        let backend = FakeBackend::default();
        let installer = installer(&temp, &backend);

        let report = installer.update_all(&registry(&["zeljournal"])).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_update_all_empty_registry_is_distinct() {
        let temp = TempDir::new().unwrap();
        let backend = FakeBackend::default();
        let installer = installer(&temp, &backend);

        let err = installer.update_all(&ModuleRegistry::default()).unwrap_err();
        assert!(matches!(err, ZelError::NoModulesConfigured));
    }

    #[test]
    fn test_clone_and_update_with_git() {
        let source = TempDir::new().unwrap();
        let (repo, url) = git::tests::source_repo(source.path(), "zeljournal");

        let temp = TempDir::new().unwrap();
        let layout = Layout::from_home(temp.path());
        let installer = Installer::with_backends(
            &layout,
            temp.path().join("install"),
            Shell::Bash,
            Box::new(Git2Vcs),
            Box::new(FakeBackend::default()),
        );

        let outcome = installer.clone_module("zeljournal", &url).unwrap();
        assert_eq!(outcome.to_string(), "Successfully cloned zeljournal");
        assert!(installer.module_dir("zeljournal").join("README.md").exists());

        git::tests::commit_file(&repo, "NEWS.md", "fresh");
        let registry = ModuleRegistry::from_modules(vec![ModuleDescriptor {
            name: "zeljournal".to_string(),
            description: "journal tool".to_string(),
            source_url: url,
        }]);
        let report = installer.update_all(&registry).unwrap();
        assert_eq!(report.updated, vec!["zeljournal"]);
        assert!(installer.module_dir("zeljournal").join("NEWS.md").exists());
    }
}
