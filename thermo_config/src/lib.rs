#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and reading-trace parsing for the thermal alarm.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//!   Every section is optional; an empty file yields the product defaults.
//! - Reading-trace CSV loader enforces headers and unit spellings.
use serde::Deserialize;

/// Display/entry unit as spelled in config and trace files.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnitName {
    #[default]
    #[serde(rename = "celsius", alias = "Celsius", alias = "C", alias = "c")]
    Celsius,
    #[serde(
        rename = "fahrenheit",
        alias = "Fahrenheit",
        alias = "F",
        alias = "f"
    )]
    Fahrenheit,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Sampling {
    /// Time between two temperature samples (ms).
    pub period_ms: u64,
}

impl Default for Sampling {
    fn default() -> Self {
        Self { period_ms: 2_000 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LimitCfg {
    /// Unit active at startup.
    pub unit: UnitName,
    /// Limit text at startup, interpreted in `unit`.
    pub initial: String,
    /// Text written to the limit when the unit is toggled to Celsius.
    pub celsius_default: String,
    /// Text written to the limit when the unit is toggled to Fahrenheit.
    pub fahrenheit_default: String,
}

impl Default for LimitCfg {
    fn default() -> Self {
        Self {
            unit: UnitName::Celsius,
            initial: "30".into(),
            celsius_default: "30".into(),
            fahrenheit_default: "86".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AlarmCfg {
    /// Rise above the dismiss-time reading that re-arms the alarm (°C).
    pub hysteresis_margin_c: f64,
    /// Rightward swipe distance that dismisses the alarm.
    pub dismiss_distance: f64,
}

impl Default for AlarmCfg {
    fn default() -> Self {
        Self {
            hysteresis_margin_c: 1.0,
            dismiss_distance: 100.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PowerBackend {
    #[default]
    Sim,
    Sysfs,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PowerCfg {
    pub backend: PowerBackend,
    /// Power monitor polling interval (ms).
    pub poll_ms: u64,
}

impl Default for PowerCfg {
    fn default() -> Self {
        Self {
            backend: PowerBackend::Sim,
            poll_ms: 500,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Simulation {
    /// Starting temperature of every simulated session (°C).
    pub ambient_c: f64,
    /// Added to a uniform(0,1) draw on each simulated sample.
    pub drift_c: f64,
    /// Fixed RNG seed; absent means a fresh seed per session.
    pub seed: Option<u64>,
    /// Whether the simulated charger starts plugged in.
    pub start_charging: bool,
    /// Simulated battery level in percent.
    pub battery_percent: Option<u8>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            ambient_c: 25.0,
            drift_c: -0.2,
            seed: None,
            start_charging: false,
            battery_percent: Some(80),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub sampling: Sampling,
    pub limit: LimitCfg,
    pub alarm: AlarmCfg,
    pub power: PowerCfg,
    pub simulation: Simulation,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Parse limit text the way the alarm does: trimmed, finite numbers only.
pub fn parse_limit_text(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Sampling
        if self.sampling.period_ms == 0 {
            eyre::bail!("sampling.period_ms must be >= 1");
        }
        if self.sampling.period_ms > 60 * 60 * 1000 {
            eyre::bail!("sampling.period_ms is unreasonably large (>1h)");
        }

        // Limit
        for (key, text) in [
            ("limit.celsius_default", &self.limit.celsius_default),
            ("limit.fahrenheit_default", &self.limit.fahrenheit_default),
        ] {
            if parse_limit_text(text).is_none() {
                eyre::bail!("{key} must be a finite number, got {text:?}");
            }
        }
        // limit.initial may be anything: invalid text just disables alarming

        // Alarm
        let margin = self.alarm.hysteresis_margin_c;
        if !margin.is_finite() || margin < 0.0 {
            eyre::bail!("alarm.hysteresis_margin_c must be a finite value >= 0.0");
        }
        let dist = self.alarm.dismiss_distance;
        if !dist.is_finite() || dist <= 0.0 {
            eyre::bail!("alarm.dismiss_distance must be a finite value > 0.0");
        }

        // Power
        if self.power.poll_ms == 0 {
            eyre::bail!("power.poll_ms must be >= 1");
        }

        // Simulation
        if !self.simulation.ambient_c.is_finite() || !self.simulation.drift_c.is_finite() {
            eyre::bail!("simulation.ambient_c and simulation.drift_c must be finite");
        }
        if let Some(pct) = self.simulation.battery_percent
            && pct > 100
        {
            eyre::bail!("simulation.battery_percent must be in [0, 100]");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot:?}");
        }

        Ok(())
    }
}

/// Reading-trace CSV schema.
///
/// Expected headers:
/// temperature,unit
///
/// Example:
/// temperature,unit
/// 25.0,C
/// 88.5,F
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct TraceRow {
    pub temperature: f64,
    pub unit: UnitName,
}

pub fn load_trace_csv(path: &std::path::Path) -> eyre::Result<Vec<TraceRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open reading trace CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["temperature", "unit"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "reading trace CSV must have headers 'temperature,unit', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<TraceRow>().enumerate() {
        match rec {
            Ok(row) if row.temperature.is_finite() => rows.push(row),
            Ok(row) => {
                eyre::bail!(
                    "invalid CSV row {}: temperature {} is not finite",
                    idx + 2,
                    row.temperature
                );
            }
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    if rows.is_empty() {
        eyre::bail!("reading trace {:?} has no rows", path);
    }
    Ok(rows)
}
