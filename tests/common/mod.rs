// Shared fakes for the integration tests: a backend that records every call
// and a sleeper that records every delay.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use archdesk::error::InstallError;
use archdesk::installer::Installer;
use archdesk::logic::resolver::Resolver;
use archdesk::logic::retry::{RetryPolicy, Sleeper};
use archdesk::package_manager::PackageBackend;
use archdesk::types::{AurHelper, PackageSource};

/// One observed backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Query(String),
    Sync,
    HelperCheck,
    Install(String, PackageSource),
}

/// What an install of a given package does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Fail this many times, then succeed
    FailTimes(u32),
    /// Never succeed
    AlwaysFail,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub installed: HashSet<String>,
    pub scripts: HashMap<String, Script>,
    pub helper: bool,
    pub sync_fails: bool,
    pub calls: Vec<Call>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            helper: true,
            ..Self::default()
        }
    }

    pub fn with_installed(mut self, name: &str) -> Self {
        self.installed.insert(name.to_string());
        self
    }

    pub fn with_script(mut self, name: &str, script: Script) -> Self {
        self.scripts.insert(name.to_string(), script);
        self
    }

    pub fn without_helper(mut self) -> Self {
        self.helper = false;
        self
    }

    /// Install calls, in order
    pub fn installs(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Install(name, _) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn installs_of(&self, name: &str) -> usize {
        self.installs().iter().filter(|n| **n == name).count()
    }

    pub fn syncs(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Sync).count()
    }

    fn attempt(&mut self, name: &str, source: PackageSource) -> Result<(), InstallError> {
        self.calls.push(Call::Install(name.to_string(), source));
        let fail = match self.scripts.get_mut(name) {
            Some(Script::AlwaysFail) => true,
            Some(Script::FailTimes(n)) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        };
        if fail {
            return Err(InstallError::ExitStatus {
                program: "pacman".to_string(),
                code: 1,
                stderr: format!("error: target not found: {}", name),
            });
        }
        self.installed.insert(name.to_string());
        Ok(())
    }
}

impl PackageBackend for RecordingBackend {
    fn is_installed(&mut self, name: &str) -> bool {
        self.calls.push(Call::Query(name.to_string()));
        self.installed.contains(name)
    }

    fn sync_databases(&mut self) -> Result<(), InstallError> {
        self.calls.push(Call::Sync);
        if self.sync_fails {
            return Err(InstallError::ExitStatus {
                program: "pacman".to_string(),
                code: 1,
                stderr: "error: failed to synchronize all databases".to_string(),
            });
        }
        Ok(())
    }

    fn install_repo(&mut self, name: &str) -> Result<(), InstallError> {
        self.attempt(name, PackageSource::Repo)
    }

    fn helper_available(&mut self) -> bool {
        self.calls.push(Call::HelperCheck);
        self.helper
    }

    fn install_aur(&mut self, name: &str) -> Result<(), InstallError> {
        if !self.helper {
            return Err(InstallError::HelperUnavailable(AurHelper::Yay));
        }
        self.attempt(name, PackageSource::Aur)
    }

    fn helper(&self) -> AurHelper {
        AurHelper::Yay
    }
}

#[derive(Debug, Default)]
pub struct RecordingSleeper {
    pub delays: Vec<Duration>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.delays.push(duration);
    }
}

pub type TestResolver = Resolver<RecordingBackend, RecordingSleeper>;

pub fn resolver(backend: RecordingBackend) -> TestResolver {
    resolver_with(backend, RetryPolicy::default())
}

pub fn resolver_with(backend: RecordingBackend, policy: RetryPolicy) -> TestResolver {
    Resolver::new(Installer::new(backend, RecordingSleeper::default(), policy))
}
