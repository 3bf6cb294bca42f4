//! Concurrency tests for flowfit.
//!
//! These tests verify that multiple processes can safely:
//! - Check in against the same data directory at once
//! - Complete a workout while other processes read the history

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("config.toml"), "[remote]\nenabled = false\n")
        .expect("Failed to write config");
    dir
}

fn data_dir(root: &Path) -> PathBuf {
    root.join("data")
}

fn cli(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("flowfit"));
    cmd.arg("--data-dir")
        .arg(data_dir(root))
        .arg("--config")
        .arg(root.join("config.toml"))
        .env_remove("OPENAI_API_KEY");
    cmd
}

fn set_profile(root: &Path) {
    cli(root)
        .args(["profile", "set", "--gender", "male", "--goal", "Saúde"])
        .args(["--location", "Casa", "--equipment", "Nenhum", "--minutes", "10"])
        .assert()
        .success();
}

fn read_jsonl(path: &Path) -> Vec<serde_json::Value> {
    match fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).expect("Log line is not valid JSON"))
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[test]
fn test_concurrent_checkins_keep_logs_paired() {
    let temp_dir = setup_test_dir();
    let root = temp_dir.path().to_path_buf();
    set_profile(&root);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let root = root.clone();
            thread::spawn(move || {
                cli(&root)
                    .args(["checkin", "--feeling", "stable"])
                    .output()
                    .expect("Failed to run flowfit")
                    .status
                    .success()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .filter(|ok| *ok)
        .count();

    // Every accepted check-in left exactly one workout and one check-in
    assert!(successes >= 1, "Expected at least one check-in to succeed");
    let workouts = read_jsonl(&data_dir(&root).join("workouts.jsonl"));
    let check_ins = read_jsonl(&data_dir(&root).join("checkins.jsonl"));
    assert_eq!(workouts.len(), successes);
    assert_eq!(check_ins.len(), successes);
}

#[test]
fn test_completion_during_history_reads() {
    let temp_dir = setup_test_dir();
    let root = temp_dir.path().to_path_buf();
    set_profile(&root);

    cli(&root)
        .args(["checkin", "--feeling", "motivated"])
        .assert()
        .success();

    let workouts_path = data_dir(&root).join("workouts.jsonl");
    let id = read_jsonl(&workouts_path)[0]["id"]
        .as_str()
        .expect("Workout id is a string")
        .to_string();

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let root = root.clone();
            thread::spawn(move || {
                for _ in 0..3 {
                    cli(&root).arg("history").assert().success();
                }
            })
        })
        .collect();

    cli(&root).args(["complete", &id]).assert().success();

    for reader in readers {
        reader.join().expect("Reader thread panicked");
    }

    let workouts = read_jsonl(&workouts_path);
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0]["completed"], serde_json::Value::Bool(true));
}
