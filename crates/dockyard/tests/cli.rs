use assert_cmd::Command; // Bring Command into scope
use predicates::prelude::*; // Bring predicate traits into scope

fn dockyard() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("dockyard")?;
    cmd.env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn test_ping_command() -> Result<(), Box<dyn std::error::Error>> {
    dockyard()?
        .arg("--ping")
        .assert()
        .success()
        .stdout(predicate::str::contains("pong"));
    Ok(())
}

#[test]
fn test_no_args_runs_normally() -> Result<(), Box<dyn std::error::Error>> {
    dockyard()?
        .assert()
        .success()
        .stdout(predicate::str::contains("Dockyard v"))
        .stdout(predicate::str::contains("pong").not());
    Ok(())
}

#[test]
fn test_actions_listed_in_priority_order() -> Result<(), Box<dyn std::error::Error>> {
    dockyard()?
        .arg("actions")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)1\. New file.*2\. Open recent")?);
    Ok(())
}

#[test]
fn test_plugins_lists_capabilities() -> Result<(), Box<dyn std::error::Error>> {
    dockyard()?
        .arg("plugins")
        .assert()
        .success()
        .stdout(predicate::str::contains("console-log"))
        .stdout(predicate::str::contains(
            "welcome-screen v0.1.0: loaded [message source, dockable content, \
             file-open consumer, quick actions, quick-action display]",
        ));
    Ok(())
}

#[test]
fn test_raise_prints_status_log() -> Result<(), Box<dyn std::error::Error>> {
    dockyard()?
        .args(["raise", "warning", "disk almost full"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning [welcome-screen]: disk almost full"));
    Ok(())
}

#[test]
fn test_raise_rejects_unknown_kind() -> Result<(), Box<dyn std::error::Error>> {
    dockyard()?
        .args(["raise", "loud", "hello"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown message kind 'loud'"));
    Ok(())
}

#[test]
fn test_demo_delivers_posted_message() -> Result<(), Box<dyn std::error::Error>> {
    dockyard()?
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Delivered 1 posted message(s)"))
        .stdout(predicate::str::contains("Info [demo-worker]: Background scan finished"));
    Ok(())
}

#[test]
fn test_config_file_sets_welcome_title_and_overrides() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("dockyard.json");
    std::fs::write(
        &path,
        r#"{ "welcome_title": "Start", "quick_action_priorities": { "welcome.open-recent": 50 } }"#,
    )?;

    dockyard()?
        .arg("--config")
        .arg(&path)
        .arg("actions")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)1\. Open recent.*2\. New file")?);
    Ok(())
}

#[test]
fn test_disabled_plugin_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("dockyard.json");
    std::fs::write(&path, r#"{ "disabled_plugins": ["console-log"] }"#)?;

    dockyard()?
        .arg("--config")
        .arg(&path)
        .arg("plugins")
        .assert()
        .success()
        .stdout(predicate::str::contains("welcome-screen"))
        .stdout(predicate::str::contains("console-log").not());
    Ok(())
}

#[test]
fn test_missing_config_falls_back_with_warning() -> Result<(), Box<dyn std::error::Error>> {
    dockyard()?
        .args(["--config", "/nonexistent/dockyard.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("falling back to defaults"));
    Ok(())
}

#[test]
fn test_raised_message_reaches_stderr_once() -> Result<(), Box<dyn std::error::Error>> {
    let output = dockyard()?
        .args(["raise", "warning", "disk almost full"])
        .output()?;

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert_eq!(stderr.matches("disk almost full").count(), 1, "stderr: {}", stderr);
    Ok(())
}

#[test]
fn test_config_fallback_reaches_stderr_once() -> Result<(), Box<dyn std::error::Error>> {
    let output = dockyard()?
        .args(["--config", "/nonexistent/dockyard.json"])
        .output()?;

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert_eq!(
        stderr.matches("falling back to defaults").count(),
        1,
        "stderr: {}",
        stderr
    );
    Ok(())
}

#[test]
fn test_startup_is_logged_to_stderr() -> Result<(), Box<dyn std::error::Error>> {
    dockyard()?
        .assert()
        .success()
        .stderr(predicate::str::contains("Initializing Dockyard"))
        .stderr(predicate::str::contains("Console logging filter: info"));
    Ok(())
}
