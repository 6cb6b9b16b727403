//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use pointmap::models::{
    AppConfiguration, FileEntry, GroupEntry, PointCategory, SystemVariable,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Full-layout manifest covering every section.
pub const FULL_MANIFEST: &str = r#"[SETVAR]
$SPEED = 100
$MODE=auto
[/SETVAR]

[FILES]
init.ls RUN
helper.ls
[/FILES]

[DI]
RACK: 1
SLOT: 2
START: 1
RANGE: 1 - 3
1,"Start"
2,"Stop"
3,"Reset"
[/DI]

[DO]
RACK: 0
SLOT: 0
START: 1
RANGE: 1 - 2
1,Lamp
2,Horn
[/DO]

[GI]
RACK: 1
SLOT: 3
START: 10
LENGTH: 8
1, "Feed"
[/GI]

[GO]
RACK: 2
SLOT: 1
START: 20
LENGTH: 4
1, "Pusher"
[/GO]

[R]
1,"Count"
5,"Total"
[/R]"#;

/// Path to the pointmap binary
pub fn pointmap_bin() -> &'static str {
    env!("CARGO_BIN_EXE_pointmap")
}

/// Creates a Command with an isolated config directory.
///
/// Pass the same directory to every command in one test so they share a store.
/// The directory is also the working directory, so default export paths land
/// inside it.
pub fn isolated_command(args: &[&str], config_dir: &Path) -> Command {
    let mut cmd = Command::new(pointmap_bin());
    cmd.env("POINTMAP_CONFIG_DIR", config_dir);
    cmd.current_dir(config_dir);
    cmd.env_remove("RUST_LOG");
    cmd.args(args);
    cmd
}

/// Runs a command in an isolated config directory and returns its output.
pub fn run(args: &[&str], config_dir: &Path) -> Output {
    isolated_command(args, config_dir)
        .output()
        .expect("Failed to execute command")
}

/// Runs a command and asserts it exits with code 0.
pub fn run_ok(args: &[&str], config_dir: &Path) -> Output {
    let output = run(args, config_dir);
    assert_eq!(
        output.status.code(),
        Some(0),
        "Command {:?} should succeed. stderr: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

/// Parses a command's stdout as JSON.
pub fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("Should parse JSON output")
}

/// Writes `content` to `name` inside `dir`.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture file");
    path
}

/// Creates a temp dir holding a manifest file.
pub fn create_temp_manifest(content: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_file(temp_dir.path(), "Line1_manifest.dt", content);
    (path, temp_dir)
}

/// A configuration with something in every section.
///
/// Every label map is normalized, so the value survives a full-layout round
/// trip unchanged.
pub fn test_config_populated() -> AppConfiguration {
    let mut config = AppConfiguration::default();

    config.digital_inputs.block.size = 3;
    config.digital_inputs.block.rack = Some(1);
    config.digital_inputs.block.slot = Some(2);
    config.flags.block.size = 2;
    config.registers.block.size = 4;

    for category in PointCategory::ALL {
        config.table_mut(category).normalize_labels();
    }

    config.digital_inputs.labels.insert(1, "Start".to_string());
    config.digital_inputs.labels.insert(2, "Stop".to_string());
    config.flags.labels.insert(2, "Ready".to_string());
    config.registers.labels.insert(4, "Total".to_string());

    config.group_inputs.push(GroupEntry {
        number: 1,
        name: "Feed".to_string(),
        rack: 1,
        slot: 3,
        start: 10,
        length: 8,
    });
    config.files.push(FileEntry::new("init.ls", true));
    config.system_variables.push(SystemVariable::new("$SPEED", "100"));
    config
}
