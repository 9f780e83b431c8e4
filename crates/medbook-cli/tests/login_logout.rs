//! Integration tests for login, logout and whoami.


use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use fixtures::{api_url, can_bind_localhost, session_path, temp_home, write_session};
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_stores_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/patient/login"))
        .and(body_json(json!({"email": "ann@example.com", "password": "hunter22"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "t1",
            "refresh": "r1",
            "role": "PATIENT",
            "user_id": 3,
            "patient_id": 9,
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("medbook")
        .env("MEDBOOK_HOME", home.path())
        .env("MEDBOOK_API_BASE_URL", api_url(&server.uri()))
        .args(["login", "--patient", "--email", "ann@example.com"])
        .write_stdin("hunter22\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as Patient"))
        .stdout(predicate::str::contains("Patient Dashboard"));

    let saved: Value =
        serde_json::from_str(&fs::read_to_string(session_path(home.path())).unwrap()).unwrap();
    assert_eq!(saved["access"], "t1");
    assert_eq!(saved["refresh"], "r1");
    assert_eq!(saved["role"], "PATIENT");
    assert_eq!(saved["user_id"], "3");
    assert_eq!(saved["patient_id"], "9");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(session_path(home.path()))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600, "session.json should be owner-only");
    }
}

#[tokio::test]
async fn test_login_with_bad_credentials_keeps_logged_out() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/doctor/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .mount(&server)
        .await;

    cargo_bin_cmd!("medbook")
        .env("MEDBOOK_HOME", home.path())
        .env("MEDBOOK_API_BASE_URL", api_url(&server.uri()))
        .args(["login", "--doctor", "--email", "doc@example.com"])
        .write_stdin("wrongpass\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No active account"))
        .stderr(predicate::str::contains("Session expired").not());

    assert!(!session_path(home.path()).exists());
}

#[test]
fn test_login_requires_password() {
    let home = temp_home();

    cargo_bin_cmd!("medbook")
        .env("MEDBOOK_HOME", home.path())
        .args(["login", "--admin", "--email", "root@example.com"])
        .write_stdin("\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Password cannot be empty"));
}

#[test]
fn test_whoami_shows_saved_session() {
    let home = temp_home();
    write_session(home.path(), "DOCTOR", "t1");

    cargo_bin_cmd!("medbook")
        .env("MEDBOOK_HOME", home.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Role: Doctor"))
        .stdout(predicate::str::contains("Doctor ID: 21"))
        .stdout(predicate::str::contains("/doctor/dashboard"));
}

#[test]
fn test_whoami_when_not_logged_in() {
    let home = temp_home();

    cargo_bin_cmd!("medbook")
        .env("MEDBOOK_HOME", home.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[test]
fn test_logout_removes_session() {
    let home = temp_home();
    write_session(home.path(), "PATIENT", "t1");

    cargo_bin_cmd!("medbook")
        .env("MEDBOOK_HOME", home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));

    assert!(!session_path(home.path()).exists());
}

#[test]
fn test_logout_when_not_logged_in() {
    let home = temp_home();

    cargo_bin_cmd!("medbook")
        .env("MEDBOOK_HOME", home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}
