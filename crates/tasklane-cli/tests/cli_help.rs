use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("tasklane")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("account"))
        .stdout(predicate::str::contains("tasks"))
        .stdout(predicate::str::contains("--data-dir"));
}

#[test]
fn test_account_help_shows_subcommands() {
    cargo_bin_cmd!("tasklane")
        .args(["account", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("whoami"))
        .stdout(predicate::str::contains("reset-password"));
}

#[test]
fn test_tasks_help_shows_subcommands() {
    cargo_bin_cmd!("tasklane")
        .args(["tasks", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("toggle"))
        .stdout(predicate::str::contains("rm"));
}

#[test]
fn test_unknown_category_is_rejected() {
    cargo_bin_cmd!("tasklane")
        .args(["tasks", "add", "x", "--category", "chores"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown category"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("tasklane")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
