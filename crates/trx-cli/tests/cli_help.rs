use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_shows_about_and_subcommands() {
    Command::cargo_bin("trx")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Terminal transcript viewer"))
        .stdout(predicate::str::contains("view"))
        .stdout(predicate::str::contains("dump"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn no_args_prints_help() {
    Command::cargo_bin("trx")
        .unwrap()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn missing_file_is_an_error() {
    Command::cargo_bin("trx")
        .unwrap()
        .args(["dump", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.txt"));
}
