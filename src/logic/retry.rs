//! Retry policy for install attempts.
//!
//! Sleeping is routed through the [`Sleeper`] trait: the binary blocks the
//! thread, tests record the requested delays instead.

use std::time::Duration;

use crate::types::{BackoffStrategy, PackageSource};

/// Hard ceiling on attempts per candidate.
pub const MAX_ATTEMPTS: u32 = 3;

/// Base delay between repository install attempts.
pub const DEFAULT_REPO_DELAY: Duration = Duration::from_secs(2);

/// Base delay between AUR install attempts.
pub const DEFAULT_AUR_DELAY: Duration = Duration::from_secs(3);

/// How many times a candidate is tried and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per candidate, clamped to `1..=MAX_ATTEMPTS`
    pub max_attempts: u32,
    pub strategy: BackoffStrategy,
    pub repo_delay: Duration,
    pub aur_delay: Duration,
    /// Run `pacman -Sy` before every repository retry
    pub sync_before_retry: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            strategy: BackoffStrategy::default(),
            repo_delay: DEFAULT_REPO_DELAY,
            aur_delay: DEFAULT_AUR_DELAY,
            sync_before_retry: true,
        }
    }
}

impl RetryPolicy {
    /// Policy that never waits. Used by dry runs.
    pub fn immediate() -> Self {
        Self {
            repo_delay: Duration::ZERO,
            aur_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Attempts actually allowed, whatever the configured value.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.clamp(1, MAX_ATTEMPTS)
    }

    /// Base delay for `source`.
    pub fn base_delay(&self, source: PackageSource) -> Duration {
        match source {
            PackageSource::Repo => self.repo_delay,
            PackageSource::Aur => self.aur_delay,
        }
    }

    /// Delay to wait after failed attempt `attempt` (1-based).
    pub fn delay_after(&self, source: PackageSource, attempt: u32) -> Duration {
        let base = self.base_delay(source);
        let attempt = attempt.max(1);
        match self.strategy {
            BackoffStrategy::Fixed => base,
            BackoffStrategy::Linear => base.saturating_mul(attempt),
            BackoffStrategy::Exponential => {
                base.saturating_mul(2u32.saturating_pow(attempt - 1))
            }
        }
    }
}

/// Blocking delay between attempts.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps on the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(strategy: BackoffStrategy) -> RetryPolicy {
        RetryPolicy {
            strategy,
            ..RetryPolicy::default()
        }
    }

    #[test]
    fn test_default_policy_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 3);
        assert_eq!(policy.base_delay(PackageSource::Repo), Duration::from_secs(2));
        assert_eq!(policy.base_delay(PackageSource::Aur), Duration::from_secs(3));
        assert!(policy.sync_before_retry);
    }

    #[test]
    fn test_fixed_backoff() {
        let p = policy(BackoffStrategy::Fixed);
        assert_eq!(p.delay_after(PackageSource::Repo, 1), Duration::from_secs(2));
        assert_eq!(p.delay_after(PackageSource::Repo, 2), Duration::from_secs(2));
    }

    #[test]
    fn test_linear_backoff() {
        let p = policy(BackoffStrategy::Linear);
        assert_eq!(p.delay_after(PackageSource::Repo, 1), Duration::from_secs(2));
        assert_eq!(p.delay_after(PackageSource::Repo, 2), Duration::from_secs(4));
        assert_eq!(p.delay_after(PackageSource::Aur, 2), Duration::from_secs(6));
    }

    #[test]
    fn test_exponential_backoff() {
        let p = policy(BackoffStrategy::Exponential);
        assert_eq!(p.delay_after(PackageSource::Aur, 1), Duration::from_secs(3));
        assert_eq!(p.delay_after(PackageSource::Aur, 2), Duration::from_secs(6));
        assert_eq!(p.delay_after(PackageSource::Aur, 3), Duration::from_secs(12));
    }

    #[test]
    fn test_attempts_clamped() {
        let mut p = RetryPolicy::default();
        p.max_attempts = 0;
        assert_eq!(p.attempts(), 1);
        p.max_attempts = 10;
        assert_eq!(p.attempts(), MAX_ATTEMPTS);
    }

    #[test]
    fn test_immediate_policy_has_no_delay() {
        let p = RetryPolicy::immediate();
        assert!(p.delay_after(PackageSource::Repo, 2).is_zero());
        assert!(p.delay_after(PackageSource::Aur, 2).is_zero());
    }
}
