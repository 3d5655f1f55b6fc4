use crate::cli::{Cli, Commands, ConfigAction, ModuleAction, PathAction};
use crate::config::ConfigStore;
use crate::installer::{Installer, DEFAULT_PYTHON};
use crate::layout::Layout;
use crate::registry::ModuleRegistry;
use anyhow::{Context as _, Result};
use std::borrow::Cow;

mod config;
mod install_dir;
mod module;
mod path;

/// Resolved state shared by every command
pub struct Context {
    pub layout: Layout,
    pub registry: Cow<'static, ModuleRegistry>,
}

impl Context {
    pub fn new(cli: &Cli) -> Result<Self> {
        let layout = Layout::discover().context("Failed to resolve zel state directory")?;
        let registry = match &cli.manifest {
            Some(path) => Cow::Owned(ModuleRegistry::from_file(path)),
            None => Cow::Borrowed(ModuleRegistry::bundled()),
        };
        Ok(Self { layout, registry })
    }

    /// Installer for the current install dir, using the configured interpreter
    pub fn installer(&self) -> Result<Installer> {
        let python = ConfigStore::new(&self.layout)
            .python()?
            .unwrap_or_else(|| DEFAULT_PYTHON.to_string());
        Ok(Installer::new(&self.layout, &python))
    }
}

pub fn execute(cli: Cli) -> Result<()> {
    let ctx = Context::new(&cli)?;

    match cli.command {
        Commands::Module(action) => match action {
            ModuleAction::List => module::list(&ctx),
            ModuleAction::Get { module } => module::get(&ctx, &module),
            ModuleAction::Install => module::install(&ctx),
            ModuleAction::Update => module::update(&ctx),
            ModuleAction::Installed => module::installed(&ctx),
        },

        Commands::Path(action) => match action {
            PathAction::Set { key, value } => path::set(&ctx, &key, &value),
            PathAction::Get {
                key,
                override_value,
                save,
                default,
                expand,
            } => path::get(
                &ctx,
                &key,
                override_value.as_deref(),
                save,
                default.as_deref(),
                expand,
            ),
            PathAction::List => path::list(&ctx),
            PathAction::Available => path::available(),
            PathAction::Suggest { partial } => path::suggest(&partial),
        },

        Commands::Config(action) => match action {
            ConfigAction::Get { key, app } => config::get(&ctx, key.as_deref(), app.as_deref()),
            ConfigAction::Set { key, value, app } => {
                config::set(&ctx, &key, &value, app.as_deref())
            }
        },

        Commands::InstallDir { path, reset } => install_dir::execute(&ctx, path.as_deref(), reset),

        Commands::DataDir { app } => install_dir::data_dir(&ctx, &app),
    }
}
