//! Explicit state threaded through a provisioning run.

use crate::platform::PlatformInfo;

/// Step counter and detected platform for one run.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Steps started so far (1-based once the first step begins)
    pub step: usize,
    pub total_steps: usize,
    pub platform: PlatformInfo,
    pub dry_run: bool,
}

impl RunContext {
    pub fn new(platform: PlatformInfo, total_steps: usize, dry_run: bool) -> Self {
        Self {
            step: 0,
            total_steps,
            platform,
            dry_run,
        }
    }

    /// Advance to the next step and log its label as `[i/n] label`.
    ///
    /// Returns the new step number.
    pub fn begin_step(&mut self, label: &str) -> usize {
        self.step += 1;
        if self.step > self.total_steps {
            self.total_steps = self.step;
        }
        tracing::info!("[{}/{}] {}", self.step, self.total_steps, label);
        self.step
    }

    pub fn progress(&self) -> String {
        format!("{}/{}", self.step, self.total_steps)
    }
}
