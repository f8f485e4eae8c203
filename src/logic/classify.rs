//! Name-based package source inference.
//!
//! Candidates in the built-in catalog carry an explicit [`PackageSource`].
//! Inference is only used for config entries that leave the source out and
//! for the `classify` subcommand.

use crate::types::PackageSource;

/// Suffixes that only ever appear on AUR packages.
pub const AUR_SUFFIXES: &[&str] = &["-bin", "-git"];

/// AUR-only packages whose names carry no suffix marker.
pub const AUR_ONLY: &[&str] = &[
    "yay",
    "yay-bin",
    "paru",
    "google-chrome",
    "spotify",
    "zoom",
    "slack-desktop",
    "wps-office",
    "freeoffice",
    "ttf-ms-fonts",
    "sublime-text-4",
    "pamac-aur",
];

/// Infer where `name` has to be installed from.
pub fn classify(name: &str) -> PackageSource {
    let name = name.trim();
    if AUR_ONLY.contains(&name) || AUR_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
        PackageSource::Aur
    } else {
        PackageSource::Repo
    }
}
