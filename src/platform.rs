//! Platform detection
//!
//! Facts about the machine archdesk runs on. Everything here is informational:
//! it is logged at startup and shown in the summary, but never changes which
//! packages are attempted.

use std::fmt;
use std::path::Path;

/// Detected platform facts for one run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlatformInfo {
    /// Value of `XDG_CURRENT_DESKTOP`, else `DESKTOP_SESSION`
    pub desktop_session: Option<String>,
    /// `/etc/arch-release` exists
    pub is_arch: bool,
    pub is_root: bool,
}

impl PlatformInfo {
    pub fn detect(is_root: bool) -> Self {
        let info = Self {
            desktop_session: desktop_session_from(|key| std::env::var(key).ok()),
            is_arch: Path::new("/etc/arch-release").exists(),
            is_root,
        };
        tracing::debug!("Detected platform: {}", info);
        info
    }
}

/// Desktop session name from an environment lookup.
///
/// `XDG_CURRENT_DESKTOP` may be a colon-separated list (`ubuntu:GNOME`);
/// the first entry wins.
pub fn desktop_session_from<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    ["XDG_CURRENT_DESKTOP", "DESKTOP_SESSION"]
        .into_iter()
        .filter_map(|key| lookup(key))
        .filter_map(|value| value.split(':').next().map(|s| s.trim().to_string()))
        .find(|value| !value.is_empty())
}

impl fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "desktop={}, arch={}, root={}",
            self.desktop_session.as_deref().unwrap_or("unknown"),
            self.is_arch,
            self.is_root
        )
    }
}
