//! Integration tests for the liftlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - Workout logging and form validation
//! - Catalog seeding and type management
//! - Dashboard rendering
//! - CSV export and deletion

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("liftlog"))
}

/// Log one bench workout into the given data dir
fn add_bench_workout(data_dir: &Path) {
    cli()
        .arg("add")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--date")
        .arg("2024-01-10T09:00:00Z")
        .arg("--exercise")
        .arg("Bench Press:100x5x3")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout logged"));
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Personal workout log and training dashboard",
        ));
}

#[test]
fn test_add_creates_store_files() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    add_bench_workout(&data_dir);

    assert!(data_dir.join("types.json").exists());
    assert!(data_dir.join("workouts.json").exists());
}

#[test]
fn test_types_file_is_seeded() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("types")
        .arg("list")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press"))
        .stdout(predicate::str::contains("Overhead Press"));

    let raw = fs::read_to_string(data_dir.join("types.json")).expect("Failed to read types.json");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("types.json must be JSON");
    assert_eq!(parsed.as_array().map(|a| a.len()), Some(5));
}

#[test]
fn test_add_requires_exercises() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("add")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one exercise"));
}

#[test]
fn test_add_rejects_nonpositive_numbers() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("add")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--exercise")
        .arg("Bench Press:0x5x3")
        .assert()
        .failure()
        .stderr(predicate::str::contains("positive"));

    // nothing was written
    let raw = fs::read_to_string(temp_dir.path().join("workouts.json")).unwrap_or_default();
    assert!(!raw.contains("exercises"));
}

#[test]
fn test_add_rejects_unknown_type() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("add")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--exercise")
        .arg("Zercher Carry:100x5x3")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown exercise type"));
}

#[test]
fn test_add_rejects_malformed_spec() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("add")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--exercise")
        .arg("Bench Press:100x5")
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME:WEIGHTxREPSxSETS"));
}

#[test]
fn test_list_shows_logged_workout() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    add_bench_workout(&data_dir);

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press"))
        .stdout(predicate::str::contains("1500"));
}

#[test]
fn test_list_query_filters() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    add_bench_workout(&data_dir);
    cli()
        .arg("add")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--exercise")
        .arg("Squat:80x8x4")
        .assert()
        .success();

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--query")
        .arg("squat")
        .assert()
        .success()
        .stdout(predicate::str::contains("Squat"))
        .stdout(predicate::str::contains("Bench Press").not());
}

#[test]
fn test_default_command_shows_last_workout() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts yet"));

    add_bench_workout(&data_dir);

    cli()
        .arg("last")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press"))
        .stdout(predicate::str::contains("Volume: 1500"));
}

#[test]
fn test_delete_workout_roundtrip() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let output = cli()
        .arg("add")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--exercise")
        .arg("Deadlift:140x3x5")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8_lossy(&output);
    let id = stdout
        .lines()
        .find_map(|l| l.trim().strip_prefix("id: "))
        .expect("add must print the workout id")
        .trim()
        .to_string();

    cli()
        .arg("delete")
        .arg(&id)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout deleted"));

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts yet"));
}

#[test]
fn test_delete_unknown_workout() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("delete")
        .arg("00000000-0000-4000-8000-000000000000")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No workout with id"));
}

#[test]
fn test_types_add_and_delete() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let output = cli()
        .arg("types")
        .arg("add")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--name")
        .arg("Hip Thrust")
        .arg("--muscle-group")
        .arg("Glutes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added type Hip Thrust"))
        .get_output()
        .stdout
        .clone();

    cli()
        .arg("types")
        .arg("list")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Hip Thrust"));

    let stdout = String::from_utf8_lossy(&output);
    let id = stdout
        .lines()
        .find_map(|l| l.trim().strip_prefix("id: "))
        .expect("types add must print the id")
        .trim()
        .to_string();

    cli()
        .arg("types")
        .arg("delete")
        .arg(&id)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Type deleted"));
}

#[test]
fn test_dashboard_renders_all_panels() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    add_bench_workout(&data_dir);

    cli()
        .arg("dashboard")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("TRAINING VOLUME OVER TIME"))
        .stdout(predicate::str::contains("TOP VOLUME BY EXERCISE"))
        .stdout(predicate::str::contains("ESTIMATED 1RM (EPLEY)"))
        .stdout(predicate::str::contains("SESSIONS PER WEEK"))
        // Epley for 100 kg x 5 reps: 100 * (1 + 5/30) ≈ 117
        .stdout(predicate::str::contains("Bench Press 117"));
}

#[test]
fn test_dashboard_empty_log() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("dashboard")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts yet"));
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let out = data_dir.join("export.csv");

    add_bench_workout(&data_dir);

    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 rows"));

    let contents = fs::read_to_string(&out).expect("Failed to read CSV");
    assert!(contents.contains("workout_id,date,notes,exercise"));
    assert!(contents.contains("Bench Press"));
}

#[test]
fn test_sync_requires_configuration() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("sync")
        .arg("status")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}
