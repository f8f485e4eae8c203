//! Configuration file handling.
//!
//! A JSON document can replace the built-in catalog and tune the retry
//! policy. Every field is optional; missing fields take the built-in
//! defaults.
//!
//! ```json
//! {
//!   "aur_helper": "paru",
//!   "retry": { "strategy": "exponential", "repo_delay_secs": 1 },
//!   "categories": [
//!     { "name": "Terminal Emulator", "candidates": ["wezterm", { "name": "kitty", "source": "repo" }] }
//!   ]
//! }
//! ```
//!
//! Candidates given as bare strings have their source inferred once, when
//! the config is turned into requests.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::ArchDeskError;
use crate::logic::retry::{
    DEFAULT_AUR_DELAY, DEFAULT_REPO_DELAY, MAX_ATTEMPTS, RetryPolicy,
};
use crate::profiles;
use crate::types::{AurHelper, BackoffStrategy, CategoryRequest, PackageCandidate, PackageSource};

/// Resolver configuration that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    pub aur_helper: AurHelper,
    pub retry: RetryConfig,
    pub categories: Vec<CategoryConfig>,
}

/// Retry settings as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub strategy: BackoffStrategy,
    pub repo_delay_secs: u64,
    pub aur_delay_secs: u64,
    pub sync_before_retry: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default)]
    pub candidates: Vec<CandidateEntry>,
}

/// A candidate as written in the config: a bare name or a tagged object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateEntry {
    Name(String),
    Tagged(TaggedCandidate),
}

/// `{ "name": ..., "source": ... }`; a misspelled key is an error, not a
/// silently inferred source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaggedCandidate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PackageSource>,
}

impl CandidateEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Tagged(tagged) => &tagged.name,
        }
    }

    /// Resolve to a candidate, inferring the source when it is not given.
    pub fn to_candidate(&self) -> PackageCandidate {
        match self {
            Self::Tagged(TaggedCandidate {
                name,
                source: Some(source),
            }) => PackageCandidate::new(name.trim(), *source),
            _ => PackageCandidate::inferred(self.name().trim()),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            strategy: BackoffStrategy::default(),
            repo_delay_secs: DEFAULT_REPO_DELAY.as_secs(),
            aur_delay_secs: DEFAULT_AUR_DELAY.as_secs(),
            sync_before_retry: true,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            strategy: config.strategy,
            repo_delay: Duration::from_secs(config.repo_delay_secs),
            aur_delay: Duration::from_secs(config.aur_delay_secs),
            sync_before_retry: config.sync_before_retry,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            aur_helper: AurHelper::default(),
            retry: RetryConfig::default(),
            categories: profiles::default_requests()
                .iter()
                .map(CategoryConfig::from)
                .collect(),
        }
    }
}

impl From<&CategoryRequest> for CategoryConfig {
    fn from(request: &CategoryRequest) -> Self {
        Self {
            name: request.category.clone(),
            candidates: request
                .candidates
                .iter()
                .map(|c| {
                    CandidateEntry::Tagged(TaggedCandidate {
                        name: c.name.clone(),
                        source: Some(c.source),
                    })
                })
                .collect(),
        }
    }
}

/// Longest delay accepted between attempts
const MAX_DELAY_SECS: u64 = 300;

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON text
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Read and parse a config file without adding context
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Err(ArchDeskError::config("configuration file is empty"));
        }
        Self::from_json_str(&content)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::read_from_file(&path)
            .with_context(|| format!("Failed to load configuration from {:?}", path.as_ref()))?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::error::Result<()> {
        let retry = &self.retry;
        if retry.max_attempts == 0 || retry.max_attempts > MAX_ATTEMPTS {
            return Err(ArchDeskError::validation(format!(
                "retry.max_attempts must be between 1 and {}",
                MAX_ATTEMPTS
            )));
        }
        if retry.repo_delay_secs > MAX_DELAY_SECS || retry.aur_delay_secs > MAX_DELAY_SECS {
            return Err(ArchDeskError::validation(format!(
                "retry delays cannot exceed {} seconds",
                MAX_DELAY_SECS
            )));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            let label = category.name.trim();
            if label.is_empty() {
                return Err(ArchDeskError::validation("Category name must be specified"));
            }
            if !seen.insert(label.to_lowercase()) {
                return Err(ArchDeskError::validation(format!(
                    "Duplicate category: {}",
                    label
                )));
            }
            for entry in &category.candidates {
                validate_package_name(entry.name().trim()).map_err(|msg| {
                    ArchDeskError::validation(format!("{}: {}", label, msg))
                })?;
            }
        }

        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from(&self.retry)
    }

    /// Category requests in config order
    pub fn requests(&self) -> Vec<CategoryRequest> {
        self.categories
            .iter()
            .map(|category| {
                CategoryRequest::new(
                    category.name.trim(),
                    category.candidates.iter().map(CandidateEntry::to_candidate).collect(),
                )
            })
            .collect()
    }
}

/// Package names follow makepkg's rules: alphanumerics and `@._+-`, not
/// starting with a hyphen or dot.
///
/// Names reach `pacman` as a single argv entry, never through a shell.
pub fn validate_package_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Package name must be specified".to_string());
    }
    if name.starts_with('-') || name.starts_with('.') {
        return Err(format!("Package name cannot start with '-' or '.': {}", name));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || "@._+-".contains(*c)))
    {
        return Err(format!("Invalid character {:?} in package name: {}", bad, name));
    }
    Ok(())
}
