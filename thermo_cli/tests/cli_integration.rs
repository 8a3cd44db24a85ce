use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_trace(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("trace.csv");
    fs::write(&path, body).unwrap();
    path
}

fn write_config(dir: &tempfile::TempDir, toml: &str) -> PathBuf {
    let path = dir.path().join("thermo.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn thermo() -> Command {
    let mut cmd = Command::cargo_bin("thermo").unwrap();
    cmd.arg("--log-level").arg("error");
    cmd
}

#[rstest]
#[case(&["--help"], "Usage:")]
#[case(&["run", "--help"], "--max-samples")]
#[case(&["self-check"], "OK")]
fn basic_commands(#[case] args: &[&str], #[case] needle: &str) {
    thermo()
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains(needle));
}

#[rstest]
#[case::celsius("temperature,unit\n25.0,C\n28.0,C\n31.0,C\n", &[])]
// 88 °F is 31.1 °C
#[case::fahrenheit_rows("temperature,unit\n77.0,F\n82.4,F\n88.0,F\n", &[])]
#[case::fahrenheit_display("temperature,unit\n25.0,C\n28.0,C\n31.0,C\n", &["--unit", "f"])]
fn trace_run_raises_alarm(#[case] trace: &str, #[case] extra: &[&str]) {
    let dir = tempdir().unwrap();
    let trace = write_trace(&dir, trace);
    thermo()
        .arg("run")
        .arg("--trace")
        .arg(&trace)
        .args(["--charging", "--no-input", "--period-ms", "10"])
        .args(["--max-samples", "3"])
        .args(extra)
        .assert()
        .success()
        .stdout(predicate::str::contains("ALARM: Battery Temperature Limit Reached!"))
        .stdout(predicate::str::contains("phase=alarming"))
        .stdout(predicate::str::contains("alarms=1"));
}

#[test]
fn trace_below_limit_stays_monitoring() {
    let dir = tempdir().unwrap();
    let trace = write_trace(&dir, "temperature,unit\n25.0,C\n28.0,C\n30.0,C\n");
    thermo()
        .arg("run")
        .arg("--trace")
        .arg(&trace)
        .args(["--charging", "--no-input", "--period-ms", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ALARM").not())
        .stdout(predicate::str::contains("samples=3 alarms=0"))
        .stdout(predicate::str::contains("phase=monitoring"));
}

#[test]
fn invalid_limit_never_alarms() {
    let dir = tempdir().unwrap();
    let trace = write_trace(&dir, "temperature,unit\n50.0,C\n60.0,C\n");
    thermo()
        .arg("run")
        .arg("--trace")
        .arg(&trace)
        .args(["--charging", "--no-input", "--period-ms", "10", "--limit", "hot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alarm disabled"))
        .stdout(predicate::str::contains("alarms=0"));
}

#[test]
fn bad_trace_header_is_reported() {
    let dir = tempdir().unwrap();
    let trace = write_trace(&dir, "temp,unit\n25.0,C\n");
    thermo()
        .arg("run")
        .arg("--trace")
        .arg(&trace)
        .args(["--charging", "--no-input"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Expected 'temperature,unit'"));
}

#[test]
fn invalid_config_exits_2() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "[sampling]\nperiod_ms = 0\n");
    thermo()
        .arg("--config")
        .arg(&cfg)
        .arg("self-check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("sampling.period_ms"));
}

#[test]
fn unknown_backend_exits_2_with_json_error() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "[power]\nbackend = \"bluetooth\"\n");
    let out = thermo()
        .arg("--json")
        .arg("--config")
        .arg(&cfg)
        .arg("health")
        .assert()
        .code(2)
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8_lossy(&out);
    let line = stderr
        .lines()
        .find(|l| l.contains("\"reason\""))
        .expect("json error line");
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["reason"], "Config");
}

#[test]
fn health_prints_json() {
    let dir = tempdir().unwrap();
    let cfg = write_config(
        &dir,
        "[simulation]\nstart_charging = true\nbattery_percent = 64\n",
    );
    let out = thermo()
        .arg("--json")
        .arg("--config")
        .arg(&cfg)
        .arg("health")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["status"], "ok");
    assert_eq!(v["power_backend"], "sim");
    assert_eq!(v["power"]["charging"], true);
    assert_eq!(v["power"]["battery_percent"], 64);
}

#[test]
fn config_file_limit_is_used() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "[limit]\ninitial = \"27\"\n");
    let trace = write_trace(&dir, "temperature,unit\n25.0,C\n28.0,C\n");
    thermo()
        .arg("--config")
        .arg(&cfg)
        .arg("run")
        .arg("--trace")
        .arg(&trace)
        .args(["--charging", "--no-input", "--period-ms", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ALARM"))
        .stdout(predicate::str::contains("samples=2 alarms=1"));
}
