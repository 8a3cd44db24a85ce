//! `From` implementations bridging `thermo_config` types to `thermo_core` types.

use crate::config::{AlarmCfg, LimitCfg, PowerCfg, SamplingCfg};
use crate::units::{TempUnit, Temperature};

// ── Units ────────────────────────────────────────────────────────────────────

impl From<thermo_config::UnitName> for TempUnit {
    fn from(u: thermo_config::UnitName) -> Self {
        match u {
            thermo_config::UnitName::Celsius => TempUnit::Celsius,
            thermo_config::UnitName::Fahrenheit => TempUnit::Fahrenheit,
        }
    }
}

impl From<&thermo_config::TraceRow> for Temperature {
    fn from(r: &thermo_config::TraceRow) -> Self {
        Temperature::new(r.temperature, r.unit.into())
    }
}

// ── SamplingCfg ──────────────────────────────────────────────────────────────

impl From<&thermo_config::Sampling> for SamplingCfg {
    fn from(c: &thermo_config::Sampling) -> Self {
        Self {
            period_ms: c.period_ms,
        }
    }
}

// ── AlarmCfg ─────────────────────────────────────────────────────────────────

impl From<&thermo_config::AlarmCfg> for AlarmCfg {
    fn from(c: &thermo_config::AlarmCfg) -> Self {
        Self {
            hysteresis_margin_c: c.hysteresis_margin_c,
            dismiss_distance: c.dismiss_distance,
        }
    }
}

// ── LimitCfg ─────────────────────────────────────────────────────────────────

impl From<&thermo_config::LimitCfg> for LimitCfg {
    fn from(c: &thermo_config::LimitCfg) -> Self {
        Self {
            unit: c.unit.into(),
            initial: c.initial.clone(),
            celsius_default: c.celsius_default.clone(),
            fahrenheit_default: c.fahrenheit_default.clone(),
        }
    }
}

// ── PowerCfg ─────────────────────────────────────────────────────────────────

impl From<&thermo_config::PowerCfg> for PowerCfg {
    fn from(c: &thermo_config::PowerCfg) -> Self {
        Self { poll_ms: c.poll_ms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_defaults_match_runtime_defaults() {
        let file = thermo_config::Config::default();
        let alarm: AlarmCfg = (&file.alarm).into();
        let limit: LimitCfg = (&file.limit).into();
        let sampling: SamplingCfg = (&file.sampling).into();
        let power: PowerCfg = (&file.power).into();

        assert_eq!(alarm.hysteresis_margin_c, AlarmCfg::default().hysteresis_margin_c);
        assert_eq!(alarm.dismiss_distance, AlarmCfg::default().dismiss_distance);
        assert_eq!(limit.initial, LimitCfg::default().initial);
        assert_eq!(limit.default_for(TempUnit::Fahrenheit), "86");
        assert_eq!(sampling.period_ms, SamplingCfg::default().period_ms);
        assert_eq!(power.poll_ms, PowerCfg::default().poll_ms);
    }

    #[test]
    fn trace_row_keeps_its_unit() {
        let row = thermo_config::TraceRow {
            temperature: 87.8,
            unit: thermo_config::UnitName::Fahrenheit,
        };
        let t = Temperature::from(&row);
        assert_eq!(t.unit(), TempUnit::Fahrenheit);
        assert!((t.as_celsius() - 31.0).abs() < 1e-9);
    }
}
