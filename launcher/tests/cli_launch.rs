//! CLI tests for `launcher list`, `launcher launch` and `launcher stage`.
//!
//! Spawns the launcher binary against a config file whose modules point into
//! a scratch directory and verifies exit codes and printed output.

use std::path::{Path, PathBuf};
use std::process::Command;

use launcher::exit_codes;
use launcher::io::config::{LauncherConfig, write_config};
use launcher::test_support::descriptor;

fn write_suite_config(dir: &Path, heart_exe: &Path) -> PathBuf {
    let mut cfg = LauncherConfig {
        modules: vec![
            descriptor("heart", heart_exe),
            descriptor("liver", dir.join("Liver").join("Liver.exe")),
        ],
        ..LauncherConfig::default()
    };
    cfg.staging.tick_ms = 0;
    cfg.staging.asset_root = dir.join("cache");
    let path = dir.join("suite.toml");
    write_config(&path, &cfg).expect("write config");
    path
}

fn launcher(config: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_launcher"))
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("run launcher")
}

#[test]
fn launch_missing_module_exits_with_not_found_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let heart = temp.path().join("Heart").join("Heart.exe");
    let config = write_suite_config(temp.path(), &heart);

    let out = launcher(&config, &["launch", "liver"]);
    assert_eq!(out.status.code(), Some(exit_codes::NOT_FOUND));
    assert!(String::from_utf8_lossy(&out.stderr).contains("'liver' not found"));
}

#[test]
fn launch_unknown_module_exits_with_invalid_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = write_suite_config(temp.path(), &temp.path().join("Heart.exe"));

    let out = launcher(&config, &["launch", "spleen"]);
    assert_eq!(out.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown module 'spleen'"));
}

#[test]
fn list_json_reports_readiness_in_catalog_order() {
    let temp = tempfile::tempdir().expect("tempdir");
    let heart = temp.path().join("Heart.exe");
    std::fs::write(&heart, b"").expect("write heart");
    let config = write_suite_config(temp.path(), &heart);

    let out = launcher(&config, &["list", "--json"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    let entries: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    let entries = entries.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], "heart");
    assert_eq!(entries[0]["status"], "ready");
    assert_eq!(entries[1]["id"], "liver");
    assert_eq!(entries[1]["status"], "missing");
}

#[test]
fn stage_runs_every_module_to_completion() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = write_suite_config(temp.path(), &temp.path().join("Heart.exe"));

    let out = launcher(&config, &["stage", "heart", "liver"]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("heart: staged"), "{stdout}");
    assert!(stdout.contains("liver: staged"), "{stdout}");
    assert!(stdout.contains("liver: 100%"), "{stdout}");
    assert!(!temp.path().join("cache").exists(), "staging must not write files");
}

#[cfg(unix)]
#[test]
fn launch_with_exe_override_starts_the_script() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = write_suite_config(temp.path(), &temp.path().join("Heart.exe"));
    let script = launcher::test_support::write_script(
        &temp.path().join("Override"),
        "Heart.exe",
        "touch launched.txt\n",
    );

    let out = launcher(
        &config,
        &["launch", "heart", "--exe", script.to_str().expect("utf8 path")],
    );
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Launching 'heart'"));

    // The launcher does not wait for the child, so poll for its side effect.
    let marker = temp.path().join("Override").join("launched.txt");
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
    while !marker.exists() {
        assert!(std::time::Instant::now() < deadline, "child never ran");
        std::thread::sleep(std::time::Duration::from_millis(20));
    }
}
