use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn capture() -> Command {
    Command::cargo_bin("capture").unwrap()
}

#[test]
fn help_lists_the_options() {
    capture()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--skip-header"));
}

#[test]
fn missing_port_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    capture()
        .current_dir(dir.path())
        .args(["--port", "/dev/does-not-exist-rs232scope", "--deadline-ms", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("opening /dev/does-not-exist-rs232scope"));

    assert!(!dir.path().join("output.csv").exists());
}

#[test]
fn bad_config_is_rejected_before_opening_the_port() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "serial": {{ "mode": "8Z1" }} }}"#).unwrap();

    capture()
        .arg("--config")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("parity"));
}

#[test]
fn out_of_range_channel_is_rejected() {
    capture()
        .args(["--channel", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("channel must be between 1 and 4"));
}
