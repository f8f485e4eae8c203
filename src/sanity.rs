//! Pre-flight checks for the provisioning environment
//!
//! Nothing can be installed without `pacman`, and repository installs need
//! `sudo` unless archdesk itself runs as root. Missing binaries abort before
//! the confirmation prompt; everything found later is a warning.

use crate::process_guard::CommandProcessGroup;
use std::process::{Command, Stdio};

/// Result of environment verification
#[derive(Debug)]
pub struct SanityCheckResult {
    pub missing_binaries: Vec<String>,
    pub is_root: bool,
}

impl SanityCheckResult {
    pub fn is_ok(&self) -> bool {
        self.missing_binaries.is_empty()
    }
}

/// Check if a binary is available in PATH
pub fn binary_exists(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .in_new_process_group()
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Check if running as root (EUID 0)
pub fn is_running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Binaries that must exist for a given privilege level
fn required_binaries(is_root: bool) -> &'static [&'static str] {
    if is_root {
        &["pacman"]
    } else {
        &["pacman", "sudo"]
    }
}

pub fn verify_environment() -> SanityCheckResult {
    let is_root = is_running_as_root();
    let missing_binaries = required_binaries(is_root)
        .iter()
        .filter(|binary| !binary_exists(binary))
        .map(|binary| binary.to_string())
        .collect();

    SanityCheckResult {
        missing_binaries,
        is_root,
    }
}

/// Verify the environment, or print what is missing and exit 1.
pub fn run_preflight_checks() -> SanityCheckResult {
    tracing::debug!("Running pre-flight checks");
    let result = verify_environment();

    if !result.is_ok() {
        eprintln!("✗ Missing required binaries: {}", result.missing_binaries.join(", "));
        eprintln!("  archdesk only runs on Arch Linux (or derivatives) with pacman installed.");
        std::process::exit(1);
    }

    if result.is_root {
        tracing::warn!("Running as root: AUR helpers refuse to build as root, AUR candidates will fail");
    }

    tracing::info!("Pre-flight checks passed (root={})", result.is_root);
    result
}
