//! Installer primitives
//!
//! One primitive per [`PackageSource`]. Both share the same contract:
//!
//! 1. Already in the local database → `AlreadyPresent`, no install attempted
//! 2. Otherwise install, retrying per [`RetryPolicy`] with a backoff sleep
//!    between attempts
//! 3. Every error is logged and absorbed; the result is always an
//!    [`InstallOutcome`]
//!
//! The repository primitive re-syncs the package databases before each
//! retry. The AUR primitive fails immediately, without consuming an attempt,
//! when no helper is available.

use crate::logic::retry::{RetryPolicy, Sleeper};
use crate::package_manager::PackageBackend;
use crate::types::{InstallOutcome, PackageCandidate, PackageSource};

/// What one primitive call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempted {
    pub outcome: InstallOutcome,
    /// Install invocations made (0 when already present or skipped)
    pub attempts: u32,
}

impl Attempted {
    fn new(outcome: InstallOutcome, attempts: u32) -> Self {
        Self { outcome, attempts }
    }
}

/// Runs installs against a backend with retry and backoff.
pub struct Installer<B, S> {
    backend: B,
    sleeper: S,
    policy: RetryPolicy,
}

impl<B: PackageBackend, S: Sleeper> Installer<B, S> {
    pub fn new(backend: B, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            backend,
            sleeper,
            policy,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn into_parts(self) -> (B, S) {
        (self.backend, self.sleeper)
    }

    /// Dispatch to the primitive matching the candidate's source.
    pub fn install(&mut self, candidate: &PackageCandidate) -> Attempted {
        match candidate.source {
            PackageSource::Repo => self.install_repo(&candidate.name),
            PackageSource::Aur => self.install_aur(&candidate.name),
        }
    }

    /// Install from the official repositories.
    pub fn install_repo(&mut self, name: &str) -> Attempted {
        if self.backend.is_installed(name) {
            tracing::info!("{} is already installed", name);
            return Attempted::new(InstallOutcome::AlreadyPresent, 0);
        }
        self.attempt_loop(name, PackageSource::Repo)
    }

    /// Install from the AUR through the configured helper.
    pub fn install_aur(&mut self, name: &str) -> Attempted {
        if self.backend.is_installed(name) {
            tracing::info!("{} is already installed", name);
            return Attempted::new(InstallOutcome::AlreadyPresent, 0);
        }
        if !self.backend.helper_available() {
            tracing::warn!(
                "Skipping AUR package {}: {} is not installed",
                name,
                self.backend.helper()
            );
            return Attempted::new(InstallOutcome::Failed, 0);
        }
        self.attempt_loop(name, PackageSource::Aur)
    }

    fn attempt_loop(&mut self, name: &str, source: PackageSource) -> Attempted {
        let max = self.policy.attempts();

        for attempt in 1..=max {
            tracing::info!("Installing {} from {} (attempt {}/{})", name, source, attempt, max);

            let result = match source {
                PackageSource::Repo => self.backend.install_repo(name),
                PackageSource::Aur => self.backend.install_aur(name),
            };

            let err = match result {
                Ok(()) => {
                    tracing::info!("Installed {}", name);
                    return Attempted::new(InstallOutcome::Installed, attempt);
                }
                Err(err) => err,
            };

            tracing::warn!("Attempt {}/{} for {} failed: {}", attempt, max, name, err);
            if !err.is_retryable() {
                return Attempted::new(InstallOutcome::Failed, attempt);
            }
            if attempt == max {
                break;
            }

            let delay = self.policy.delay_after(source, attempt);
            tracing::debug!("Retrying {} in {:?}", name, delay);
            self.sleeper.sleep(delay);

            if source == PackageSource::Repo && self.policy.sync_before_retry {
                if let Err(e) = self.backend.sync_databases() {
                    tracing::warn!("Database sync before retry failed: {}", e);
                }
            }
        }

        tracing::warn!("Giving up on {} after {} attempt(s)", name, max);
        Attempted::new(InstallOutcome::Failed, max)
    }
}
