use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("medbook")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("patient"))
        .stdout(predicate::str::contains("doctor"))
        .stdout(predicate::str::contains("admin"))
        .stdout(predicate::str::contains("open"));
}

#[test]
fn test_login_requires_a_role() {
    cargo_bin_cmd!("medbook")
        .args(["login", "--email", "a@b.c"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--patient"));
}

#[test]
fn test_login_rejects_two_roles() {
    cargo_bin_cmd!("medbook")
        .args(["login", "--patient", "--doctor", "--email", "a@b.c"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_doctor_help_shows_subcommands() {
    cargo_bin_cmd!("medbook")
        .args(["doctor", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("slots"))
        .stdout(predicate::str::contains("appointments"));
}

#[test]
fn test_admin_appointments_help_shows_filters() {
    cargo_bin_cmd!("medbook")
        .args(["admin", "appointments", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--doctor-id"))
        .stdout(predicate::str::contains("--status"))
        .stdout(predicate::str::contains("--date"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("medbook")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("medbook"));
}
