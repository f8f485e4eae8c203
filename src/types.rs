//! Type-safe building blocks for package provisioning
//!
//! Package sources, AUR helpers and backoff strategies are plain enums with
//! strum/serde derives so they parse from the CLI and the config file without
//! stringly-typed matching anywhere else.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

/// Where a package is installed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PackageSource {
    /// Official repositories, installed with `pacman`
    Repo,
    /// Arch User Repository, installed through an AUR helper
    Aur,
}

/// AUR helper used for community packages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AurHelper {
    #[default]
    Yay,
    Paru,
}

impl AurHelper {
    /// Binary name looked up on `PATH`
    pub fn binary(self) -> &'static str {
        match self {
            Self::Yay => "yay",
            Self::Paru => "paru",
        }
    }
}

/// How the delay between install attempts grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BackoffStrategy {
    /// Always the base delay
    Fixed,
    /// `base * attempt`
    #[default]
    Linear,
    /// `base * 2^(attempt - 1)`
    Exponential,
}

/// A package name paired with the source it must be installed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageCandidate {
    pub name: String,
    pub source: PackageSource,
}

impl PackageCandidate {
    pub fn new(name: impl Into<String>, source: PackageSource) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    pub fn repo(name: impl Into<String>) -> Self {
        Self::new(name, PackageSource::Repo)
    }

    pub fn aur(name: impl Into<String>) -> Self {
        Self::new(name, PackageSource::Aur)
    }

    /// Build a candidate whose source is inferred from its name.
    pub fn inferred(name: impl Into<String>) -> Self {
        let name = name.into();
        let source = crate::logic::classify::classify(&name);
        Self { name, source }
    }
}

impl fmt::Display for PackageCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.source)
    }
}

/// An ordered list of interchangeable candidates for one functional role.
///
/// Earlier candidates are preferred. Resolution stops at the first one that
/// is present or installs successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRequest {
    pub category: String,
    pub candidates: Vec<PackageCandidate>,
}

impl CategoryRequest {
    pub fn new(category: impl Into<String>, candidates: Vec<PackageCandidate>) -> Self {
        Self {
            category: category.into(),
            candidates,
        }
    }
}

/// Terminal state of one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    AlreadyPresent,
    Installed,
    Failed,
}

impl InstallOutcome {
    pub fn is_success(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyPresent => write!(f, "already present"),
            Self::Installed => write!(f, "installed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Result of resolving a whole category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    Satisfied(PackageCandidate),
    Unsatisfied,
}

impl CategoryOutcome {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied(_))
    }

    /// The winning candidate, if any
    pub fn candidate(&self) -> Option<&PackageCandidate> {
        match self {
            Self::Satisfied(candidate) => Some(candidate),
            Self::Unsatisfied => None,
        }
    }
}
