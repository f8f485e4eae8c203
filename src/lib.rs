//! archdesk Library
//!
//! Resolves desktop categories to the first installable package among
//! ordered candidates, from the official repositories or the AUR.

pub mod cli;
pub mod config_file;
pub mod context;
pub mod error;
pub mod installer;
pub mod logging;
pub mod logic;
pub mod package_manager;
pub mod platform;
pub mod process_guard;
pub mod profiles;
pub mod sanity;
pub mod types;

// Re-export main types for convenience
pub use config_file::ResolverConfig;
pub use context::RunContext;
pub use error::{ArchDeskError, InstallError};
pub use installer::{Attempted, Installer};
pub use logic::provision::run_provision;
pub use logic::report::{CategoryReport, RunReport};
pub use logic::resolver::Resolver;
pub use logic::retry::{RetryPolicy, Sleeper, ThreadSleeper};
pub use package_manager::{DryRunBackend, PackageBackend, SystemBackend};
pub use platform::PlatformInfo;
pub use process_guard::{CommandProcessGroup, ProcessGuard};
pub use types::{
    AurHelper, BackoffStrategy, CategoryOutcome, CategoryRequest, InstallOutcome,
    PackageCandidate, PackageSource,
};
