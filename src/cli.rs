use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::AurHelper;

/// archdesk - Best-first desktop package provisioning for Arch Linux
#[derive(Parser, Debug)]
#[command(name = "archdesk")]
#[command(about = "Install one package per desktop category, falling back through alternatives")]
#[command(version)]
pub struct Cli {
    /// Skip the confirmation prompt.
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Dry-run mode: show what would be installed without making changes.
    ///
    /// Presence queries still run so the preview is realistic. Installs and
    /// database syncs are logged and reported as successful.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Configuration file replacing the built-in catalog
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for the timestamped log file
    #[arg(long, global = true, default_value = ".")]
    pub log_dir: PathBuf,

    /// AUR helper to use (overrides the config file)
    #[arg(long, global = true)]
    pub helper: Option<AurHelper>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Provision every category (default)
    Run,
    /// Print categories and their candidates without installing anything
    Plan,
    /// Print the inferred source of each package name
    Classify {
        /// Package names
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        config: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// The subcommand to run, `run` when none was given.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}

/// Whether a confirmation answer means yes. Anything else, including an
/// empty line, is a no.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
