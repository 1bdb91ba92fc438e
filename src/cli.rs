//! Clap adapter.
//!
//! Compiled only with the `clap` feature (on by default). [`CheckArgs`]
//! parses the `dict-ldap-check` command line and [`CheckArgs::into_action`]
//! bridges it to the framework-agnostic [`DictAction`]; everything after
//! that goes through [`SettingsLoader::handle`](crate::SettingsLoader::handle).

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::builder::SettingsLoader;
use crate::types::{DictAction, SearchPath};

/// Arguments shared by every subcommand.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Directory to search for the settings file. May be repeated; later
    /// directories override earlier ones. Defaults to the platform config dir.
    #[arg(short = 'd', long = "dir", global = true)]
    pub dirs: Vec<PathBuf>,

    /// Settings file name inside each directory.
    #[arg(short, long, global = true)]
    pub file: Option<String>,

    /// Ignore unknown keys instead of failing.
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Do not read environment variables.
    #[arg(long, global = true)]
    pub no_env: bool,

    #[command(subcommand)]
    pub action: Option<CheckSubcommand>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum CheckSubcommand {
    /// Load every map and print the compiled patterns.
    Check,
    /// Print every field of one map.
    Show {
        /// Map name as declared in `maps`.
        map: String,
    },
    /// Generate a commented map section template.
    Gen {
        /// Map name used in the section header.
        #[arg(short, long, default_value = "example")]
        name: String,

        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl CheckArgs {
    /// Convert clap-parsed args into a `DictAction`. No subcommand means `check`.
    pub fn into_action(self) -> DictAction {
        match self.action {
            None | Some(CheckSubcommand::Check) => DictAction::Check,
            Some(CheckSubcommand::Show { map }) => DictAction::Show { map },
            Some(CheckSubcommand::Gen { name, output }) => DictAction::Gen { name, output },
        }
    }

    /// Apply the location and mode flags to `loader`.
    pub fn configure(&self, mut loader: SettingsLoader) -> SettingsLoader {
        if !self.dirs.is_empty() {
            loader = loader.search_paths(self.dirs.iter().cloned().map(SearchPath::Path).collect());
        }
        if let Some(file) = &self.file {
            loader = loader.file_name(file);
        }
        if self.no_env {
            loader = loader.no_env();
        }
        loader.strict(!self.lenient)
    }
}
