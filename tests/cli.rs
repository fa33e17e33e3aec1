use assert_cmd::prelude::*;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Unsigned token whose `exp` claim is `offset_secs` from now
fn token_expiring_in(offset_secs: i64) -> String {
    let exp = Utc::now().timestamp() + offset_secs;
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"1","exp":{}}}"#, exp));
    format!("{}.{}.sig", header, claims)
}

/// `eatit` pointed at a throwaway store and config
fn eatit(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("eatit"));
    cmd.arg("--store")
        .arg(dir.join("session.db"))
        .arg("--config")
        .arg(dir.join("config.yaml"))
        .env_remove("EATIT_FORMAT")
        .env_remove("EATIT_LANG")
        .env_remove("EATIT_TOKEN")
        .env_remove("EATIT_DEBUG")
        .env_remove("RUST_LOG");
    cmd
}

fn login(dir: &Path, token: &str) -> assert_cmd::assert::Assert {
    eatit(dir)
        .args([
            "login",
            "--token",
            token,
            "--user-id",
            "1",
            "--user-name",
            "alice",
            "--email",
            "a@x.com",
            "--role-id",
            "2",
            "--role-name",
            "User",
        ])
        .assert()
}

fn status_json(dir: &Path) -> serde_json::Value {
    let assert = eatit(dir)
        .args(["status", "--format", "json"])
        .assert()
        .success();
    serde_json::from_slice(&assert.get_output().stdout).expect("status output is JSON")
}

#[test]
fn login_then_status_reports_user() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    login(temp.path(), &token_expiring_in(3600))
        .success()
        .stdout(predicate::str::contains("Signed in as"))
        .stdout(predicate::str::contains("alice"));

    let status = status_json(temp.path());
    assert_eq!(status["data"]["state"], "authenticated");
    assert_eq!(status["data"]["user_name"], "alice");
    assert_eq!(status["data"]["email"], "a@x.com");
    assert_eq!(status["data"]["role"], "User");

    Ok(())
}

#[test]
fn logout_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    login(temp.path(), &token_expiring_in(3600)).success();

    eatit(temp.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out alice"));

    eatit(temp.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active session"));

    assert_eq!(status_json(temp.path())["data"]["state"], "anonymous");

    Ok(())
}

#[test]
fn login_inside_expiry_buffer_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    login(temp.path(), &token_expiring_in(120))
        .failure()
        .stderr(predicate::str::contains("Your session has expired"))
        .stderr(predicate::str::contains("eatit login"));

    assert_eq!(status_json(temp.path())["data"]["state"], "anonymous");

    Ok(())
}

#[test]
fn login_with_malformed_token_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    login(temp.path(), "not-a-jwt")
        .failure()
        .stderr(predicate::str::contains("expired or unreadable"));

    assert_eq!(status_json(temp.path())["data"]["state"], "anonymous");

    Ok(())
}

#[test]
fn notice_follows_language_flag() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    eatit(temp.path())
        .args([
            "--lang",
            "vi",
            "login",
            "--token",
            "not-a-jwt",
            "--user-id",
            "1",
            "--user-name",
            "alice",
            "--email",
            "a@x.com",
            "--role-id",
            "2",
            "--role-name",
            "User",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("hết hạn"));

    Ok(())
}

#[test]
fn notice_follows_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    fs::write(
        temp.path().join("config.yaml"),
        "language: vi\nlogin_url: https://eatit.example/login\n",
    )?;

    login(temp.path(), "not-a-jwt")
        .failure()
        .stderr(predicate::str::contains("hết hạn"))
        .stderr(predicate::str::contains("https://eatit.example/login"));

    Ok(())
}

#[test]
fn status_without_session() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    eatit(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"))
        .stdout(predicate::str::contains("session.db"));

    Ok(())
}

#[test]
fn status_table_format() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    login(temp.path(), &token_expiring_in(7200)).success();

    eatit(temp.path())
        .args(["status", "--format", "table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STATE"))
        .stdout(predicate::str::contains("authenticated"))
        .stdout(predicate::str::contains("alice"));

    Ok(())
}

#[test]
fn invalid_config_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    fs::write(temp.path().join("config.yaml"), "check_interval_secs: 0\n")?;

    eatit(temp.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("check_interval_secs"));

    Ok(())
}

#[test]
fn version_prints_package_version() {
    let temp = tempdir().unwrap();

    eatit(temp.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
