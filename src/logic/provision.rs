//! Provisioning orchestration
//!
//! Runs the pre-flight steps, then resolves every category in order.
//!
//! # Failure Policy
//!
//! Nothing in this module is fatal. Each pre-flight step returns a
//! `Result`; an `Err` becomes a warning in the [`RunReport`] and the run
//! continues. Unsatisfied categories are recorded and the next category
//! starts.

use crate::context::RunContext;
use crate::error::InstallError;
use crate::logic::report::RunReport;
use crate::logic::resolver::Resolver;
use crate::logic::retry::Sleeper;
use crate::package_manager::PackageBackend;
use crate::types::{CategoryRequest, PackageSource};

/// Number of pre-flight steps counted in [`RunContext::total_steps`].
pub const PREFLIGHT_STEPS: usize = 2;

/// Total steps for a run over `requests`.
pub fn total_steps(requests: &[CategoryRequest]) -> usize {
    PREFLIGHT_STEPS + requests.len()
}

/// Refresh package databases once before anything is installed.
pub fn sync_step<B: PackageBackend>(backend: &mut B) -> Result<(), InstallError> {
    backend.sync_databases()
}

/// Number of AUR candidates across `requests`.
pub fn aur_candidate_count(requests: &[CategoryRequest]) -> usize {
    requests
        .iter()
        .flat_map(|r| &r.candidates)
        .filter(|c| c.source == PackageSource::Aur)
        .count()
}

/// Check the AUR helper when any request has AUR candidates.
pub fn helper_step<B: PackageBackend>(
    backend: &mut B,
    requests: &[CategoryRequest],
) -> Result<(), InstallError> {
    if aur_candidate_count(requests) == 0 {
        tracing::debug!("No AUR candidates requested");
        return Ok(());
    }

    if backend.helper_available() {
        tracing::info!("AUR helper {} found", backend.helper());
        Ok(())
    } else {
        Err(InstallError::HelperUnavailable(backend.helper()))
    }
}

/// Run a complete provisioning pass.
pub fn run_provision<B, S>(
    ctx: &mut RunContext,
    resolver: &mut Resolver<B, S>,
    requests: &[CategoryRequest],
) -> RunReport
where
    B: PackageBackend,
    S: Sleeper,
{
    let mut report = RunReport::default();

    tracing::info!("Platform: {}", ctx.platform);
    if ctx.dry_run {
        tracing::info!("Dry run: nothing will be installed");
    }

    ctx.begin_step("Synchronizing package databases");
    if let Err(e) = sync_step(resolver.installer_mut().backend_mut()) {
        let msg = format!("Package database sync failed: {}", e);
        tracing::warn!("{}", msg);
        report.warnings.push(msg);
    }

    ctx.begin_step("Checking AUR helper");
    if let Err(e) = helper_step(resolver.installer_mut().backend_mut(), requests) {
        let msg = format!(
            "{}: {} AUR candidate(s) will be skipped",
            e,
            aur_candidate_count(requests)
        );
        tracing::warn!("{}", msg);
        report.warnings.push(msg);
    }

    for request in requests {
        ctx.begin_step(&request.category);
        report.categories.push(resolver.resolve_with_report(request));
    }

    tracing::info!(
        "Provisioning complete: {}/{} categories satisfied",
        report.satisfied(),
        report.categories.len()
    );
    report
}
