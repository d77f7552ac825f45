use std::process::Command;

fn thermolink() -> Command {
    Command::new(env!("CARGO_BIN_EXE_thermolink"))
}

#[test]
fn version_prints_crate_version() {
    let output = thermolink()
        .arg("version")
        .output()
        .expect("version command should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!("thermolink {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn version_extended_lists_protocol_constants() {
    let output = thermolink()
        .arg("version")
        .arg("--extended")
        .output()
        .expect("version command should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("default_baud: 1500000"));
    assert!(stdout.contains("sync=0xA0"));
    assert!(stdout.contains("max_payload=5000"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let output = thermolink()
        .arg("frobnicate")
        .output()
        .expect("process should spawn");

    assert!(!output.status.success());
    // clap reports usage errors with exit code 2.
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn watch_on_missing_port_exits_with_transport_code() {
    let output = thermolink()
        .arg("--log-level")
        .arg("error")
        .arg("watch")
        .arg("/dev/thermolink-missing-port")
        .output()
        .expect("process should spawn");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("open failed"));
    assert!(stderr.contains("/dev/thermolink-missing-port"));
}

#[test]
fn tune_on_missing_port_exits_with_transport_code() {
    let output = thermolink()
        .arg("--log-level")
        .arg("error")
        .arg("tune")
        .arg("/dev/thermolink-missing-port")
        .arg("--tmin")
        .arg("25")
        .output()
        .expect("process should spawn");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("open failed"));
}

#[test]
fn ports_json_output_is_an_array() {
    let output = thermolink()
        .arg("--format")
        .arg("json")
        .arg("ports")
        .output()
        .expect("ports command should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("ports output should be valid JSON");
    assert!(parsed.is_array());
}
