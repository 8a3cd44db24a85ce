//! Human-readable error descriptions and structured JSON error formatting.

use thermo_core::error::{BuildError, MonitorError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingPower => {
                "What happened: No power monitor was provided to the alarm loop.\nLikely causes: The power backend failed to initialize or was not wired into the builder.\nHow to fix: Check [power] backend in the config; use \"sim\" when no battery is present.".to_string()
            }
            BuildError::MissingSource => {
                "What happened: No temperature source was provided to the alarm loop.\nLikely causes: Neither a trace nor the simulator was configured.\nHow to fix: Pass --trace FILE or keep the default simulator.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML or on the command line.\nHow to fix: Edit the config file or the flag, then rerun."
            ),
        };
    }

    if let Some(me) = err.downcast_ref::<MonitorError>() {
        return match me {
            MonitorError::Config(msg) => format!(
                "What happened: The configuration could not be used ({msg}).\nLikely causes: Typo in a key or section, wrong value type, or an out-of-range value.\nHow to fix: Compare the file with thermo.example.toml and rerun `thermo self-check`."
            ),
            MonitorError::Power(msg) => format!(
                "What happened: Power supply status is unavailable ({msg}).\nLikely causes: No battery under /sys/class/power_supply or insufficient permissions.\nHow to fix: Use [power] backend = \"sim\" on machines without a battery."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from init
    let msg = format!("{err:#}");
    let lower = msg.to_ascii_lowercase();

    if lower.contains("must have headers 'temperature,unit'") {
        return "Invalid headers in reading trace CSV. Expected 'temperature,unit'.".to_string();
    }
    if lower.contains("reading trace") || lower.contains("invalid csv row") {
        return format!(
            "What happened: The reading trace could not be loaded.\nLikely causes: Missing file, empty trace, or a row with a bad number or unit (use C or F).\nHow to fix: Fix the CSV and rerun. Original: {msg}"
        );
    }
    if lower.contains("power supply") {
        return format!(
            "What happened: Failed to open the battery power supply.\nLikely causes: No BAT* entry under /sys/class/power_supply.\nHow to fix: Use [power] backend = \"sim\". Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

fn is_config_error(err: &eyre::Report) -> bool {
    err.downcast_ref::<BuildError>().is_some()
        || matches!(
            err.downcast_ref::<MonitorError>(),
            Some(MonitorError::Config(_))
        )
}

/// Configuration and build problems exit with 2, everything else with 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if is_config_error(err) { 2 } else { 1 }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let reason = if err.downcast_ref::<BuildError>().is_some() {
        "Build"
    } else if is_config_error(err) {
        "Config"
    } else if let Some(me) = err.downcast_ref::<MonitorError>() {
        match me {
            MonitorError::Power(_) => "Power",
            MonitorError::Source(_) | MonitorError::TraceExhausted => "Source",
            MonitorError::Timeout => "Timeout",
            MonitorError::Config(_) => "Config",
        }
    } else {
        "Error"
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_exit_2() {
        let err = eyre::Report::new(MonitorError::Config("bad".into()));
        assert_eq!(exit_code_for_error(&err), 2);
        let err = eyre::Report::new(BuildError::InvalidConfig("x"));
        assert_eq!(exit_code_for_error(&err), 2);
        let err = eyre::eyre!("reading trace has no rows");
        assert_eq!(exit_code_for_error(&err), 1);
    }

    #[test]
    fn json_error_has_reason_and_message() {
        let err = eyre::Report::new(MonitorError::Config("bad".into()));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "Config");
        assert!(v["message"].as_str().unwrap().contains("bad"));
    }

    #[test]
    fn trace_header_hint() {
        let err = eyre::eyre!(
            "reading trace CSV must have headers 'temperature,unit', got: temp,unit"
        );
        assert!(humanize(&err).contains("Expected 'temperature,unit'"));
    }
}
