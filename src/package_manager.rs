//! Package manager backends
//!
//! [`PackageBackend`] is the seam between resolution logic and the system:
//! presence queries, database syncs, and one install per source kind.
//!
//! - [`SystemBackend`] shells out to `pacman` and the AUR helper
//! - [`DryRunBackend`] queries the real system but only logs mutations
//!
//! Only exit statuses are observed. Output goes to the terminal; the last
//! stderr line is kept for error messages and never parsed.

use std::process::{Command, Stdio};

use crate::error::InstallError;
use crate::process_guard::{CommandProcessGroup, run_tracked_streaming};
use crate::types::AurHelper;

/// Operations the resolver needs from a package manager.
pub trait PackageBackend {
    /// Whether `name` is in the local package database.
    fn is_installed(&mut self, name: &str) -> bool;

    /// Refresh the sync databases (`pacman -Sy`).
    fn sync_databases(&mut self) -> Result<(), InstallError>;

    /// Install one package from the official repositories.
    fn install_repo(&mut self, name: &str) -> Result<(), InstallError>;

    /// Whether the configured AUR helper can be invoked.
    fn helper_available(&mut self) -> bool;

    /// Install one package through the AUR helper.
    fn install_aur(&mut self, name: &str) -> Result<(), InstallError>;

    /// The configured AUR helper.
    fn helper(&self) -> AurHelper;
}

// ============================================================================
// System backend
// ============================================================================

/// Backend driving the real `pacman` and AUR helper binaries.
#[derive(Debug)]
pub struct SystemBackend {
    helper: AurHelper,
    /// Prefix repository operations with `sudo`
    use_sudo: bool,
    helper_cache: Option<bool>,
}

impl SystemBackend {
    pub fn new(helper: AurHelper, is_root: bool) -> Self {
        Self {
            helper,
            use_sudo: !is_root,
            helper_cache: None,
        }
    }

    /// `pacman <args>`, through sudo when not root
    fn pacman(&self, args: &[&str]) -> Command {
        let mut cmd = if self.use_sudo {
            let mut cmd = Command::new("sudo");
            cmd.arg("pacman");
            cmd
        } else {
            Command::new("pacman")
        };
        cmd.args(args);
        cmd
    }
}

impl PackageBackend for SystemBackend {
    fn is_installed(&mut self, name: &str) -> bool {
        #[cfg(feature = "alpm")]
        {
            match alpm_is_installed(name) {
                Ok(installed) => return installed,
                Err(e) => tracing::debug!("libalpm query failed, falling back to pacman -Q: {}", e),
            }
        }

        Command::new("pacman")
            .args(["-Q", name])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .in_new_process_group()
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn sync_databases(&mut self) -> Result<(), InstallError> {
        let mut cmd = self.pacman(&["-Sy", "--noconfirm"]);
        run_checked(&mut cmd, "pacman")
    }

    fn install_repo(&mut self, name: &str) -> Result<(), InstallError> {
        let mut cmd = self.pacman(&["-S", "--needed", "--noconfirm", name]);
        run_checked(&mut cmd, "pacman")
    }

    fn helper_available(&mut self) -> bool {
        let helper = self.helper;
        *self
            .helper_cache
            .get_or_insert_with(|| crate::sanity::binary_exists(helper.binary()))
    }

    fn install_aur(&mut self, name: &str) -> Result<(), InstallError> {
        if !self.helper_available() {
            return Err(InstallError::HelperUnavailable(self.helper));
        }
        // AUR helpers refuse to build as root; they escalate through sudo themselves.
        let mut cmd = Command::new(self.helper.binary());
        cmd.args(["-S", "--needed", "--noconfirm", name]);
        run_checked(&mut cmd, self.helper.binary())
    }

    fn helper(&self) -> AurHelper {
        self.helper
    }
}

/// Run a package-manager command to completion and map its exit status.
///
/// Stdin and stdout stay attached so sudo can prompt and build progress is
/// visible. Stderr is echoed as it arrives; only its last non-empty line is
/// kept for the error.
fn run_checked(cmd: &mut Command, program: &str) -> Result<(), InstallError> {
    tracing::debug!("Running {:?}", cmd);
    cmd.stdin(Stdio::inherit()).stdout(Stdio::inherit());

    let mut tail = String::new();
    let status = run_tracked_streaming(cmd, |line| {
        eprintln!("{}", line);
        let line = last_line(line);
        if !line.is_empty() {
            tail = line.to_string();
        }
    })
    .map_err(|source| InstallError::Spawn {
        program: program.to_string(),
        source,
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(InstallError::ExitStatus {
            program: program.to_string(),
            code: status.code().unwrap_or(-1),
            stderr: tail,
        })
    }
}

/// Last non-empty line, which is where pacman puts `error: target not found`.
fn last_line(text: &str) -> &str {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

#[cfg(feature = "alpm")]
fn alpm_is_installed(name: &str) -> anyhow::Result<bool> {
    use anyhow::Context;

    let handle = alpm::Alpm::new("/", "/var/lib/pacman")
        .context("Failed to initialize ALPM on /")?;
    Ok(handle.localdb().pkg(name).is_ok())
}

// ============================================================================
// Dry-run backend
// ============================================================================

/// Wraps a backend so that syncs and installs are logged, not executed.
///
/// Presence and helper queries still hit the inner backend so the plan
/// reflects the real system.
#[derive(Debug)]
pub struct DryRunBackend<B> {
    inner: B,
}

impl<B: PackageBackend> DryRunBackend<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: PackageBackend> PackageBackend for DryRunBackend<B> {
    fn is_installed(&mut self, name: &str) -> bool {
        self.inner.is_installed(name)
    }

    fn sync_databases(&mut self) -> Result<(), InstallError> {
        tracing::info!("[DRY RUN] pacman -Sy");
        Ok(())
    }

    fn install_repo(&mut self, name: &str) -> Result<(), InstallError> {
        tracing::info!("[DRY RUN] pacman -S --needed --noconfirm {}", name);
        Ok(())
    }

    fn helper_available(&mut self) -> bool {
        self.inner.helper_available()
    }

    fn install_aur(&mut self, name: &str) -> Result<(), InstallError> {
        if !self.inner.helper_available() {
            return Err(InstallError::HelperUnavailable(self.inner.helper()));
        }
        tracing::info!(
            "[DRY RUN] {} -S --needed --noconfirm {}",
            self.inner.helper(),
            name
        );
        Ok(())
    }

    fn helper(&self) -> AurHelper {
        self.inner.helper()
    }
}
