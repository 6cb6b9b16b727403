//! End-to-end tests for `pointmap config` commands.

mod fixtures;
use fixtures::*;

use tempfile::TempDir;

// ============================================================================
// Show Command Tests
// ============================================================================

#[test]
fn test_config_show_default() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_ok(&["config", "show"], temp_dir.path());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Store directory"));
    assert!(stdout.contains("reduced"));
}

#[test]
fn test_config_show_json_schema() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_ok(&["config", "show", "--json"], temp_dir.path());
    let result = stdout_json(&output);

    assert!(result["config_file"]
        .as_str()
        .unwrap()
        .ends_with("config.toml"));
    assert!(result["paths"]["store_dir"].as_str().unwrap().ends_with("store"));
    assert!(result["export"]["output_dir"].is_string());
    assert_eq!(result["export"]["layout"], "reduced");
}

// ============================================================================
// Set Command Tests
// ============================================================================

#[test]
fn test_config_set_requires_an_option() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&["config", "set"], temp_dir.path());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_config_set_layout() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    run_ok(&["config", "set", "--layout", "full"], dir);
    assert!(dir.join("config.toml").exists());

    let output = run_ok(&["config", "show", "--json"], dir);
    assert_eq!(stdout_json(&output)["export"]["layout"], "full");

    let output = run(&["config", "set", "--layout", "tiny"], dir);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_config_set_export_dir_creates_it() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let export_dir = dir.join("exports").join("dt");

    run_ok(
        &["config", "set", "--export-dir", export_dir.to_str().unwrap()],
        dir,
    );
    assert!(export_dir.is_dir());

    run_ok(&["app", "new", "Line1"], dir);
    run_ok(&["export", "--app", "Line1"], dir);
    assert!(export_dir.join("Line1_manifest.dt").exists());
}

#[test]
fn test_config_set_store_dir_moves_store() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let store_dir = dir.join("custom-store");

    run_ok(
        &["config", "set", "--store-dir", store_dir.to_str().unwrap()],
        dir,
    );
    run_ok(&["app", "new", "Line1"], dir);

    assert!(store_dir.join("apps.json").exists());
    assert!(!dir.join("store").exists());
}

#[test]
fn test_config_set_store_dir_rejects_file() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let file = write_file(dir, "not-a-dir", "");

    let output = run(&["config", "set", "--store-dir", file.to_str().unwrap()], dir);
    assert_eq!(output.status.code(), Some(1));
}
