//! Configuration types for the alarm engine.
//!
//! These are the runtime configuration structs used by `AlarmMachine` and
//! `Monitor`. They are separate from the TOML-deserialized config in
//! `thermo_config`.

use crate::gesture::DEFAULT_DISMISS_DISTANCE;
use crate::hysteresis::DEFAULT_MARGIN_C;
use crate::units::TempUnit;

/// Sampling cadence.
#[derive(Debug, Clone)]
pub struct SamplingCfg {
    /// Time between two samples in milliseconds. Default: 2000.
    pub period_ms: u64,
}

impl Default for SamplingCfg {
    fn default() -> Self {
        Self { period_ms: 2_000 }
    }
}

/// Alarm behaviour knobs.
#[derive(Debug, Clone)]
pub struct AlarmCfg {
    /// Rise (°C) above the dismiss-time reading that re-arms the alarm.
    pub hysteresis_margin_c: f64,
    /// Rightward swipe distance that dismisses.
    pub dismiss_distance: f64,
}

impl Default for AlarmCfg {
    fn default() -> Self {
        Self {
            hysteresis_margin_c: DEFAULT_MARGIN_C,
            dismiss_distance: DEFAULT_DISMISS_DISTANCE,
        }
    }
}

/// Initial limit and the per-unit texts written on unit toggle.
#[derive(Debug, Clone)]
pub struct LimitCfg {
    pub unit: TempUnit,
    pub initial: String,
    pub celsius_default: String,
    pub fahrenheit_default: String,
}

impl Default for LimitCfg {
    fn default() -> Self {
        Self {
            unit: TempUnit::Celsius,
            initial: "30".into(),
            celsius_default: "30".into(),
            fahrenheit_default: "86".into(),
        }
    }
}

impl LimitCfg {
    pub fn default_for(&self, unit: TempUnit) -> &str {
        match unit {
            TempUnit::Celsius => &self.celsius_default,
            TempUnit::Fahrenheit => &self.fahrenheit_default,
        }
    }
}

/// Power monitor polling.
#[derive(Debug, Clone)]
pub struct PowerCfg {
    /// Poll interval in milliseconds. Default: 500.
    pub poll_ms: u64,
}

impl Default for PowerCfg {
    fn default() -> Self {
        Self { poll_ms: 500 }
    }
}
