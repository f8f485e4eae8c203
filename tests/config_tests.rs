// Configuration files on disk, and the binary's config-facing commands.

use std::fs;
use std::process::Command;
use std::time::Duration;

use archdesk::config_file::{CandidateEntry, ResolverConfig, TaggedCandidate};
use archdesk::types::{AurHelper, BackoffStrategy, PackageCandidate};
use tempfile::TempDir;

const SAMPLE: &str = r#"{
    "aur_helper": "paru",
    "retry": {
        "max_attempts": 2,
        "strategy": "fixed",
        "repo_delay_secs": 1,
        "aur_delay_secs": 5,
        "sync_before_retry": false
    },
    "categories": [
        { "name": "Terminal Emulator", "candidates": ["wezterm-git", "foot"] },
        { "name": "Chat", "candidates": [{ "name": "discord", "source": "repo" }, "slack-desktop"] }
    ]
}"#;

fn write_config(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_sample_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "desk.json", SAMPLE);

    let config = ResolverConfig::load_from_file(&path).unwrap();
    config.validate().unwrap();

    assert_eq!(config.aur_helper, AurHelper::Paru);
    let policy = config.retry_policy();
    assert_eq!(policy.attempts(), 2);
    assert_eq!(policy.strategy, BackoffStrategy::Fixed);
    assert_eq!(policy.repo_delay, Duration::from_secs(1));
    assert_eq!(policy.aur_delay, Duration::from_secs(5));
    assert!(!policy.sync_before_retry);

    let requests = config.requests();
    assert_eq!(requests[0].category, "Terminal Emulator");
    assert_eq!(
        requests[0].candidates,
        vec![PackageCandidate::aur("wezterm-git"), PackageCandidate::repo("foot")]
    );
    assert_eq!(
        requests[1].candidates,
        vec![PackageCandidate::repo("discord"), PackageCandidate::aur("slack-desktop")]
    );
}

#[test]
fn test_save_keeps_explicit_sources() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.json");

    ResolverConfig::default().save_to_file(&path).unwrap();
    let loaded = ResolverConfig::load_from_file(&path).unwrap();

    let tagged = loaded
        .categories
        .iter()
        .flat_map(|c| &c.candidates)
        .all(|e| matches!(e, CandidateEntry::Tagged(TaggedCandidate { source: Some(_), .. })));
    assert!(tagged, "saved catalog should carry a source for every candidate");
    assert_eq!(loaded, ResolverConfig::default());
}

#[test]
fn test_save_to_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("desk.json");
    assert!(ResolverConfig::default().save_to_file(path).is_err());
}

// =============================================================================
// Binary
// =============================================================================

fn archdesk() -> Command {
    Command::new(env!("CARGO_BIN_EXE_archdesk"))
}

#[test]
fn test_validate_command_accepts_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "desk.json", SAMPLE);

    let output = archdesk().arg("validate").arg(&path).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 categories, 4 candidates"), "{stdout}");
}

#[test]
fn test_validate_command_rejects_bad_attempts() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "bad.json", r#"{ "retry": { "max_attempts": 7 } }"#);

    let output = archdesk().arg("validate").arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("max_attempts"));
}

#[test]
fn test_validate_command_rejects_malformed_json() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "broken.json", "{ \"categories\": [");

    let output = archdesk().arg("validate").arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_classify_command() {
    let output = archdesk()
        .args(["classify", "firefox", "yay", "neovim-git"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["firefox\trepo", "yay\taur", "neovim-git\taur"]);
}

#[test]
fn test_plan_command_prints_catalog() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "desk.json", SAMPLE);

    let output = archdesk()
        .args(["plan", "--config"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("AUR helper: paru"));
    assert!(stdout.contains("  1. wezterm-git (aur)"));
    assert!(stdout.contains("  2. slack-desktop (aur)"));
}

#[test]
fn test_plan_helper_flag_overrides_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "desk.json", SAMPLE);

    let output = archdesk()
        .args(["--helper", "yay", "plan", "--config"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).contains("AUR helper: yay"));
}

#[test]
fn test_plan_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "dup.json",
        r#"{ "categories": [ { "name": "A" }, { "name": "a" } ] }"#,
    );

    let output = archdesk().args(["plan", "--config"]).arg(&path).output().unwrap();
    assert!(!output.status.success());
}
