//! Best-first package resolver
//!
//! Resolves a [`CategoryRequest`] to the first candidate that is already
//! installed or installs successfully.
//!
//! # Resolution Rules
//!
//! | Situation                         | Result |
//! |-----------------------------------|--------|
//! | Empty candidate list              | `Unsatisfied`, no backend calls |
//! | Candidate already installed       | `Satisfied`, stop |
//! | Candidate installs within retries | `Satisfied`, stop |
//! | Candidate fails every attempt     | warn, try next candidate |
//! | Every candidate failed            | `Unsatisfied` |
//!
//! `Unsatisfied` is an ordinary return value. Nothing here panics or
//! propagates an error to the caller.

use crate::installer::Installer;
use crate::logic::report::{CandidateReport, CategoryReport};
use crate::logic::retry::Sleeper;
use crate::package_manager::PackageBackend;
use crate::types::{CategoryOutcome, CategoryRequest};

pub struct Resolver<B, S> {
    installer: Installer<B, S>,
}

impl<B: PackageBackend, S: Sleeper> Resolver<B, S> {
    pub fn new(installer: Installer<B, S>) -> Self {
        Self { installer }
    }

    pub fn installer(&self) -> &Installer<B, S> {
        &self.installer
    }

    pub fn installer_mut(&mut self) -> &mut Installer<B, S> {
        &mut self.installer
    }

    pub fn into_installer(self) -> Installer<B, S> {
        self.installer
    }

    /// Resolve `request` and return only the outcome.
    pub fn resolve(&mut self, request: &CategoryRequest) -> CategoryOutcome {
        self.resolve_with_report(request).outcome
    }

    /// Resolve `request`, recording every candidate that was tried.
    pub fn resolve_with_report(&mut self, request: &CategoryRequest) -> CategoryReport {
        let mut tried = Vec::new();

        if request.candidates.is_empty() {
            tracing::warn!("{}: no candidates given", request.category);
        }

        for candidate in &request.candidates {
            let attempted = self.installer.install(candidate);
            tried.push(CandidateReport {
                candidate: candidate.clone(),
                outcome: attempted.outcome,
                attempts: attempted.attempts,
            });

            if attempted.outcome.is_success() {
                tracing::info!(
                    "{}: satisfied by {} ({})",
                    request.category,
                    candidate.name,
                    attempted.outcome
                );
                return CategoryReport {
                    category: request.category.clone(),
                    outcome: CategoryOutcome::Satisfied(candidate.clone()),
                    candidates: tried,
                };
            }

            tracing::warn!("{}: {} failed, trying next candidate", request.category, candidate);
        }

        if !request.candidates.is_empty() {
            tracing::warn!("{}: no candidate could be installed", request.category);
        }

        CategoryReport {
            category: request.category.clone(),
            outcome: CategoryOutcome::Unsatisfied,
            candidates: tried,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstallError;
    use crate::logic::retry::RetryPolicy;
    use crate::types::{AurHelper, InstallOutcome, PackageCandidate};
    use std::collections::HashSet;
    use std::time::Duration;

    /// Backend where listed packages always fail to install.
    #[derive(Default)]
    struct Backend {
        installed: HashSet<String>,
        broken: HashSet<String>,
        calls: Vec<String>,
    }

    impl PackageBackend for Backend {
        fn is_installed(&mut self, name: &str) -> bool {
            self.installed.contains(name)
        }

        fn sync_databases(&mut self) -> Result<(), InstallError> {
            Ok(())
        }

        fn install_repo(&mut self, name: &str) -> Result<(), InstallError> {
            self.calls.push(name.to_string());
            if self.broken.contains(name) {
                return Err(InstallError::ExitStatus {
                    program: "pacman".to_string(),
                    code: 1,
                    stderr: format!("error: target not found: {}", name),
                });
            }
            self.installed.insert(name.to_string());
            Ok(())
        }

        fn helper_available(&mut self) -> bool {
            false
        }

        fn install_aur(&mut self, _name: &str) -> Result<(), InstallError> {
            Err(InstallError::HelperUnavailable(AurHelper::Yay))
        }

        fn helper(&self) -> AurHelper {
            AurHelper::Yay
        }
    }

    struct NoSleep;

    impl Sleeper for NoSleep {
        fn sleep(&mut self, _duration: Duration) {}
    }

    fn resolver(backend: Backend) -> Resolver<Backend, NoSleep> {
        Resolver::new(Installer::new(backend, NoSleep, RetryPolicy::default()))
    }

    #[test]
    fn test_first_success_wins() {
        let mut r = resolver(Backend::default());
        let request = CategoryRequest::new(
            "Terminal Emulator",
            vec![PackageCandidate::repo("alacritty"), PackageCandidate::repo("kitty")],
        );

        let outcome = r.resolve(&request);
        assert_eq!(outcome, CategoryOutcome::Satisfied(PackageCandidate::repo("alacritty")));
        assert_eq!(r.installer().backend().calls, ["alacritty"]);
    }

    #[test]
    fn test_falls_through_to_next_candidate() {
        let mut backend = Backend::default();
        backend.broken.insert("a".to_string());
        let mut r = resolver(backend);
        let request = CategoryRequest::new(
            "Office Suite",
            vec![PackageCandidate::repo("a"), PackageCandidate::repo("b")],
        );

        let report = r.resolve_with_report(&request);
        assert_eq!(report.outcome.candidate().map(|c| c.name.as_str()), Some("b"));
        assert_eq!(report.candidates[0].outcome, InstallOutcome::Failed);
        assert_eq!(report.candidates[0].attempts, 3);
        assert_eq!(report.candidates[1].attempts, 1);
    }

    #[test]
    fn test_empty_request_is_unsatisfied() {
        let mut r = resolver(Backend::default());
        let report = r.resolve_with_report(&CategoryRequest::new("Nothing", vec![]));
        assert_eq!(report.outcome, CategoryOutcome::Unsatisfied);
        assert!(report.candidates.is_empty());
        assert!(r.installer().backend().calls.is_empty());
    }

    #[test]
    fn test_already_present_short_circuits() {
        let mut backend = Backend::default();
        backend.installed.insert("firefox".to_string());
        let mut r = resolver(backend);
        let request = CategoryRequest::new(
            "Web Browser",
            vec![PackageCandidate::repo("firefox"), PackageCandidate::repo("chromium")],
        );

        let report = r.resolve_with_report(&request);
        assert!(report.outcome.is_satisfied());
        assert_eq!(report.candidates.len(), 1);
        assert_eq!(report.candidates[0].outcome, InstallOutcome::AlreadyPresent);
        assert!(r.installer().backend().calls.is_empty());
    }

    #[test]
    fn test_aur_without_helper_moves_on() {
        let mut r = resolver(Backend::default());
        let request = CategoryRequest::new(
            "Music Streaming",
            vec![PackageCandidate::aur("spotify"), PackageCandidate::repo("spotify-launcher")],
        );

        let report = r.resolve_with_report(&request);
        assert_eq!(report.candidates[0].attempts, 0);
        assert_eq!(
            report.outcome.candidate().map(|c| c.name.as_str()),
            Some("spotify-launcher")
        );
    }
}
