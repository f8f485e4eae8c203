//! Per-category and per-run reporting.

use std::fmt;

use crate::types::{CategoryOutcome, InstallOutcome, PackageCandidate};

/// What happened to one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateReport {
    pub candidate: PackageCandidate,
    pub outcome: InstallOutcome,
    pub attempts: u32,
}

/// What happened to one category, candidates in the order they were tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub category: String,
    pub outcome: CategoryOutcome,
    pub candidates: Vec<CandidateReport>,
}

impl CategoryReport {
    /// Total install invocations across all candidates.
    pub fn total_attempts(&self) -> u32 {
        self.candidates.iter().map(|c| c.attempts).sum()
    }
}

impl fmt::Display for CategoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            CategoryOutcome::Satisfied(candidate) => {
                write!(f, "✓ {}: {}", self.category, candidate.name)
            }
            CategoryOutcome::Unsatisfied if self.candidates.is_empty() => {
                write!(f, "✗ {}: no candidates", self.category)
            }
            CategoryOutcome::Unsatisfied => {
                let tried: Vec<&str> = self
                    .candidates
                    .iter()
                    .map(|c| c.candidate.name.as_str())
                    .collect();
                write!(f, "✗ {}: none installed (tried {})", self.category, tried.join(", "))
            }
        }
    }
}

/// Aggregate of a whole provisioning run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub categories: Vec<CategoryReport>,
    /// Non-fatal problems from pre-flight steps
    pub warnings: Vec<String>,
}

impl RunReport {
    pub fn satisfied(&self) -> usize {
        self.categories
            .iter()
            .filter(|c| c.outcome.is_satisfied())
            .count()
    }

    pub fn unsatisfied(&self) -> impl Iterator<Item = &CategoryReport> {
        self.categories.iter().filter(|c| !c.outcome.is_satisfied())
    }

    /// Human-readable summary printed at the end of `run`.
    pub fn summary(&self) -> String {
        let mut lines = Vec::with_capacity(self.categories.len() + self.warnings.len() + 2);
        for category in &self.categories {
            lines.push(category.to_string());
        }
        for warning in &self.warnings {
            lines.push(format!("⚠ {}", warning));
        }
        lines.push(String::new());
        lines.push(format!(
            "Provisioning complete: {}/{} categories satisfied",
            self.satisfied(),
            self.categories.len()
        ));
        lines.join("\n")
    }
}
