//! CLI-level integration tests, driven through the `vox` binary via
//! `assert_cmd`, against a fresh `tempfile` working directory per test.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn vox() -> Command {
    Command::cargo_bin("vox").expect("failed to find vox binary")
}

#[test]
fn init_creates_metadata_directory() {
    let dir = tempdir().unwrap();

    vox().arg("init").current_dir(&dir).assert().success();

    assert!(dir.path().join(".vox/objects").is_dir());
    assert!(dir.path().join(".vox/refs/heads").is_dir());
    assert!(dir.path().join(".vox/HEAD").is_file());
}

#[test]
fn add_commit_log_round_trip() {
    let dir = tempdir().unwrap();
    vox().arg("init").current_dir(&dir).assert().success();

    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    vox()
        .args(["add", "a.txt"])
        .current_dir(&dir)
        .assert()
        .success();

    vox()
        .args(["commit", "-m", "first commit"])
        .current_dir(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("first commit"));

    vox()
        .arg("log")
        .current_dir(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("first commit"));
}

#[test]
fn commands_find_the_repository_root_from_a_nested_subdirectory() {
    let dir = tempdir().unwrap();
    vox().arg("init").current_dir(&dir).assert().success();

    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    let nested = dir.path().join("src/deeply/nested");
    fs::create_dir_all(&nested).unwrap();

    vox()
        .args(["add", "a.txt"])
        .current_dir(&nested)
        .assert()
        .success();

    vox()
        .args(["commit", "-m", "from a nested dir"])
        .current_dir(&nested)
        .assert()
        .success();

    vox()
        .arg("log")
        .current_dir(&nested)
        .assert()
        .success()
        .stdout(predicate::str::contains("from a nested dir"));
}

#[test]
fn log_on_a_fresh_repository_reports_no_commits() {
    let dir = tempdir().unwrap();
    vox().arg("init").current_dir(&dir).assert().success();

    vox()
        .arg("log")
        .current_dir(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No commits yet"));
}

#[test]
fn branch_create_and_list() {
    let dir = tempdir().unwrap();
    vox().arg("init").current_dir(&dir).assert().success();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    vox().args(["add", "a.txt"]).current_dir(&dir).assert().success();
    vox()
        .args(["commit", "-m", "c1"])
        .current_dir(&dir)
        .assert()
        .success();

    vox()
        .args(["branch", "feature"])
        .current_dir(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("feature"));

    vox()
        .arg("branch")
        .current_dir(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("feature").and(predicate::str::contains("main")));
}

#[test]
fn checkout_restores_the_targets_tree() {
    let dir = tempdir().unwrap();
    vox().arg("init").current_dir(&dir).assert().success();

    fs::write(dir.path().join("a.txt"), "v1").unwrap();
    vox().args(["add", "a.txt"]).current_dir(&dir).assert().success();
    vox().args(["commit", "-m", "c1"]).current_dir(&dir).assert().success();
    vox().args(["branch", "feature"]).current_dir(&dir).assert().success();

    fs::write(dir.path().join("a.txt"), "v2").unwrap();
    vox().args(["add", "a.txt"]).current_dir(&dir).assert().success();
    vox().args(["commit", "-m", "c2"]).current_dir(&dir).assert().success();

    vox()
        .args(["checkout", "feature"])
        .current_dir(&dir)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "v1");
}

#[test]
fn clean_merge_produces_a_merge_commit() {
    let dir = tempdir().unwrap();
    vox().arg("init").current_dir(&dir).assert().success();

    fs::write(dir.path().join("base.txt"), "base").unwrap();
    vox().args(["add", "base.txt"]).current_dir(&dir).assert().success();
    vox().args(["commit", "-m", "root"]).current_dir(&dir).assert().success();
    vox().args(["branch", "feature"]).current_dir(&dir).assert().success();

    fs::write(dir.path().join("main_only.txt"), "from main").unwrap();
    vox().args(["add", "main_only.txt"]).current_dir(&dir).assert().success();
    vox().args(["commit", "-m", "main change"]).current_dir(&dir).assert().success();

    vox().args(["checkout", "feature"]).current_dir(&dir).assert().success();
    fs::write(dir.path().join("feature_only.txt"), "from feature").unwrap();
    vox().args(["add", "feature_only.txt"]).current_dir(&dir).assert().success();
    vox().args(["commit", "-m", "feature change"]).current_dir(&dir).assert().success();

    vox()
        .args(["merge", "main"])
        .current_dir(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Merge made by"));

    assert!(dir.path().join("base.txt").exists());
    assert!(dir.path().join("main_only.txt").exists());
    assert!(dir.path().join("feature_only.txt").exists());
}

#[test]
fn conflicting_merge_exits_non_zero_and_reports_the_path() {
    let dir = tempdir().unwrap();
    vox().arg("init").current_dir(&dir).assert().success();

    fs::write(dir.path().join("f.txt"), "ancestor").unwrap();
    vox().args(["add", "f.txt"]).current_dir(&dir).assert().success();
    vox().args(["commit", "-m", "root"]).current_dir(&dir).assert().success();
    vox().args(["branch", "feature"]).current_dir(&dir).assert().success();

    fs::write(dir.path().join("f.txt"), "from main").unwrap();
    vox().args(["add", "f.txt"]).current_dir(&dir).assert().success();
    vox().args(["commit", "-m", "main change"]).current_dir(&dir).assert().success();

    vox().args(["checkout", "feature"]).current_dir(&dir).assert().success();
    fs::write(dir.path().join("f.txt"), "from feature").unwrap();
    vox().args(["add", "f.txt"]).current_dir(&dir).assert().success();
    vox().args(["commit", "-m", "feature change"]).current_dir(&dir).assert().success();

    vox()
        .args(["merge", "main"])
        .current_dir(&dir)
        .assert()
        .failure()
        .stdout(predicate::str::contains("f.txt"));

    assert_eq!(fs::read_to_string(dir.path().join("f.txt")).unwrap(), "from feature");
}

#[test]
fn merging_an_unknown_branch_exits_non_zero() {
    let dir = tempdir().unwrap();
    vox().arg("init").current_dir(&dir).assert().success();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    vox().args(["add", "a.txt"]).current_dir(&dir).assert().success();
    vox().args(["commit", "-m", "c1"]).current_dir(&dir).assert().success();

    vox()
        .args(["merge", "ghost"])
        .current_dir(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn config_set_and_show_round_trip() {
    let dir = tempdir().unwrap();
    vox().arg("init").current_dir(&dir).assert().success();

    vox()
        .args(["config", "set-name", "Ada Lovelace"])
        .current_dir(&dir)
        .assert()
        .success();
    vox()
        .args(["config", "set-email", "ada@example.com"])
        .current_dir(&dir)
        .assert()
        .success();

    vox()
        .args(["config", "show"])
        .current_dir(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada Lovelace").and(predicate::str::contains("ada@example.com")));
}
