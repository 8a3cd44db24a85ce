use rstest::rstest;
use thermo_config::{PowerBackend, UnitName, load_toml};

#[test]
fn full_config_parses_and_validates() {
    let toml = r#"
[sampling]
period_ms = 1000

[limit]
unit = "fahrenheit"
initial = "95"
celsius_default = "30"
fahrenheit_default = "86"

[alarm]
hysteresis_margin_c = 1.5
dismiss_distance = 120.0

[power]
backend = "sysfs"
poll_ms = 250

[simulation]
ambient_c = 22.0
drift_c = -0.1
seed = 42
start_charging = true
battery_percent = 55

[logging]
file = "thermo.log"
level = "debug"
rotation = "daily"
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.limit.unit, UnitName::Fahrenheit);
    assert_eq!(cfg.power.backend, PowerBackend::Sysfs);
    assert_eq!(cfg.simulation.seed, Some(42));
    assert!(cfg.simulation.start_charging);
}

#[rstest]
#[case("[sampling]\nperiod_ms = 0", "sampling.period_ms must be >= 1")]
#[case("[power]\npoll_ms = 0", "power.poll_ms must be >= 1")]
#[case("[alarm]\nhysteresis_margin_c = -1.0", "alarm.hysteresis_margin_c")]
#[case("[alarm]\ndismiss_distance = 0.0", "alarm.dismiss_distance")]
#[case("[limit]\nfahrenheit_default = \"hot\"", "limit.fahrenheit_default")]
#[case("[limit]\ncelsius_default = \"\"", "limit.celsius_default")]
#[case("[simulation]\nbattery_percent = 101", "simulation.battery_percent")]
#[case("[logging]\nrotation = \"weekly\"", "logging.rotation")]
fn rejects_invalid_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    assert!(
        format!("{err}").contains(needle),
        "error {err} should mention {needle}"
    );
}

#[test]
fn invalid_initial_limit_is_allowed() {
    let cfg = load_toml("[limit]\ninitial = \"abc\"").expect("parse TOML");
    cfg.validate()
        .expect("unparseable initial limit only disables alarming");
}

#[test]
fn unknown_backend_is_a_parse_error() {
    assert!(load_toml("[power]\nbackend = \"dbus\"").is_err());
}

#[rstest]
#[case("C", UnitName::Celsius)]
#[case("celsius", UnitName::Celsius)]
#[case("F", UnitName::Fahrenheit)]
#[case("Fahrenheit", UnitName::Fahrenheit)]
fn unit_spellings(#[case] spelled: &str, #[case] expected: UnitName) {
    let cfg = load_toml(&format!("[limit]\nunit = \"{spelled}\"")).expect("parse TOML");
    assert_eq!(cfg.limit.unit, expected);
}

#[test]
fn shipped_example_config_is_valid() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../thermo.example.toml");
    let text = std::fs::read_to_string(&path).unwrap();
    let cfg = load_toml(&text).unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.simulation.seed, Some(7));
    assert!(cfg.logging.file.is_none());
}
