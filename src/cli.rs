use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Zel - installer and shared configuration for the zel tools
///
/// zel clones the zel tool repositories, installs them into a managed
/// environment, keeps them up to date, and stores the paths and settings
/// the tools share (vault, budget folder, ...).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Module manifest to use instead of the bundled one
    #[arg(long, global = true, value_name = "PATH", env = "ZEL_MANIFEST")]
    pub manifest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage zel modules (clone, install, update)
    #[command(subcommand)]
    Module(ModuleAction),

    /// Manage shared paths
    #[command(subcommand)]
    Path(PathAction),

    /// Read and write JSON settings (global or per app)
    #[command(subcommand)]
    Config(ConfigAction),

    /// Show or change the installation directory
    InstallDir {
        /// New installation directory (`~` is expanded)
        #[arg(value_name = "PATH", conflicts_with = "reset")]
        path: Option<String>,

        /// Forget the recorded directory and use the default
        #[arg(long)]
        reset: bool,
    },

    /// Print an app's private data directory
    DataDir {
        #[arg(value_name = "APP")]
        app: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModuleAction {
    /// List available zel modules
    List,

    /// Clone a module into the installation directory
    Get {
        #[arg(value_name = "MODULE")]
        module: String,
    },

    /// Install every cloned module into the zel environment
    Install,

    /// Pull every cloned module, then reinstall
    Update,

    /// List modules present in the installation directory
    Installed,
}

#[derive(Subcommand, Debug)]
pub enum PathAction {
    /// Set a path
    Set {
        #[arg(value_name = "KEY")]
        key: String,
        #[arg(value_name = "VALUE")]
        value: String,
    },

    /// Get a path
    Get {
        #[arg(value_name = "KEY")]
        key: String,

        /// Use this value instead of the stored one
        #[arg(long = "override", value_name = "VALUE")]
        override_value: Option<String>,

        /// Store the override for next time
        #[arg(long, requires = "override_value")]
        save: bool,

        /// Value to print when nothing is stored
        #[arg(long, value_name = "VALUE")]
        default: Option<String>,

        /// Expand `~` to the home directory
        #[arg(short, long)]
        expand: bool,
    },

    /// List all configured paths
    List,

    /// Show available path keys
    Available,

    /// Suggest path keys matching a partial name
    Suggest {
        #[arg(value_name = "PARTIAL", default_value = "")]
        partial: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print one key, or the whole config when no key is given
    Get {
        #[arg(value_name = "KEY")]
        key: Option<String>,

        /// App whose config to read (global config when omitted)
        #[arg(long, value_name = "APP")]
        app: Option<String>,
    },

    /// Set a key; VALUE is parsed as JSON, falling back to a string
    Set {
        #[arg(value_name = "KEY")]
        key: String,
        #[arg(value_name = "VALUE")]
        value: String,

        /// App whose config to write (global config when omitted)
        #[arg(long, value_name = "APP")]
        app: Option<String>,
    },
}
