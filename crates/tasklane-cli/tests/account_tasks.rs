use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

const PASSWORD: &str = "Passw0rd!";

fn tasklane(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("tasklane");
    cmd.env("TASKLANE_HOME", home).env_remove("TASKLANE_PASSWORD");
    cmd
}

fn register(home: &Path, email: &str) {
    tasklane(home)
        .args(["account", "register", "--email", email])
        .env("TASKLANE_PASSWORD", PASSWORD)
        .assert()
        .success()
        .stdout(predicate::str::contains("Account created successfully!"));
}

/// Adds a task and returns its id, printed on the line after the toast.
fn add_task(home: &Path, text: &str, category: &str) -> String {
    let output = tasklane(home)
        .args(["tasks", "add", text, "--category", category])
        .output()
        .unwrap();
    assert!(output.status.success(), "add failed: {output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("Task added!"));
    lines.next().expect("task id").trim().to_string()
}

#[test]
fn test_register_signs_in() {
    let home = tempdir().unwrap();
    register(home.path(), "ana@example.com");

    tasklane(home.path())
        .args(["account", "whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ana@example.com"));
}

#[test]
fn test_weak_password_is_rejected() {
    let home = tempdir().unwrap();

    tasklane(home.path())
        .args(["account", "register", "--email", "ana@example.com"])
        .args(["--password", "password"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));

    tasklane(home.path())
        .args(["account", "whoami"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn test_login_with_wrong_password_fails() {
    let home = tempdir().unwrap();
    register(home.path(), "ana@example.com");
    tasklane(home.path())
        .args(["account", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out."));

    tasklane(home.path())
        .args(["account", "login", "--email", "ana@example.com"])
        .args(["--password", "Wr0ngpass!"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Sign-in failed"));

    tasklane(home.path())
        .args(["account", "login", "--email", "ana@example.com"])
        .env("TASKLANE_PASSWORD", PASSWORD)
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in successfully!"));
}

#[test]
fn test_task_commands_require_session() {
    let home = tempdir().unwrap();

    for args in [
        vec!["tasks", "list"],
        vec!["tasks", "add", "Buy milk"],
        vec!["tasks", "toggle", "abc"],
        vec!["tasks", "rm", "abc"],
    ] {
        tasklane(home.path())
            .args(&args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Not signed in"));
    }
}

#[test]
fn test_add_toggle_remove_round_trip() {
    let home = tempdir().unwrap();
    register(home.path(), "ana@example.com");

    tasklane(home.path())
        .args(["tasks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks yet."));

    let id = add_task(home.path(), "Buy milk", "personal");

    tasklane(home.path())
        .args(["tasks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"))
        .stdout(predicate::str::contains("Personal"))
        .stdout(predicate::str::contains(id.as_str()));

    tasklane(home.path())
        .args(["tasks", "toggle", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task completed!"));
    tasklane(home.path())
        .args(["tasks", "toggle", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task marked as pending."));

    tasklane(home.path())
        .args(["tasks", "rm", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task removed!"));

    tasklane(home.path())
        .args(["tasks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks yet."));
}

#[test]
fn test_blank_task_is_rejected() {
    let home = tempdir().unwrap();
    register(home.path(), "ana@example.com");

    tasklane(home.path())
        .args(["tasks", "add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task text cannot be empty."));
}

#[test]
fn test_tasks_are_private_to_their_owner() {
    let home = tempdir().unwrap();
    register(home.path(), "ana@example.com");
    let id = add_task(home.path(), "Ana's task", "work");

    tasklane(home.path()).args(["account", "logout"]).assert().success();
    register(home.path(), "bo@example.com");

    tasklane(home.path())
        .args(["tasks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks yet."));

    tasklane(home.path())
        .args(["tasks", "toggle", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not update the task."));
    tasklane(home.path())
        .args(["tasks", "rm", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not remove the task."));
}

#[test]
fn test_data_dir_flag_overrides_config() {
    let home = tempdir().unwrap();
    let data = tempdir().unwrap();

    tasklane(home.path())
        .args(["--data-dir"])
        .arg(data.path())
        .args(["account", "register", "--email", "ana@example.com"])
        .env("TASKLANE_PASSWORD", PASSWORD)
        .assert()
        .success();

    assert!(data.path().join("session.json").exists());
    tasklane(home.path())
        .args(["account", "whoami"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}
