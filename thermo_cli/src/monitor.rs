//! Monitor wiring: config mapping, collaborator assembly, stdin commands,
//! and effect printing.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crossbeam_channel as xch;
use eyre::WrapErr;
use serde_json::{Value, json};
use thermo_config::{Config, PowerBackend};
use thermo_core::{
    Command, Effect, GestureSample, Monitor, RunSummary, Snapshot, TempUnit, Temperature,
};
use thermo_hardware::{
    PowerHandle, ReplayReadingSource, SimulatedPowerMonitor, SimulatedReadingSource,
    SysfsPowerMonitor,
};
use thermo_traits::{BoxError, PowerMonitor, ReadingSource};

/// CLI overrides for one `run`.
#[derive(Debug, Default)]
pub struct RunOpts {
    pub trace: Option<PathBuf>,
    pub period_ms: Option<u64>,
    pub limit: Option<String>,
    pub unit: Option<TempUnit>,
    pub charging: bool,
    pub max_samples: Option<u64>,
    pub no_input: bool,
}

/// One parsed stdin line.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Monitor(Command),
    Plug(bool),
    Battery(u8),
}

pub fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));
    let number = |what: &str| -> Result<f64, String> {
        rest.parse::<f64>()
            .map_err(|_| format!("{what} needs a number, got {rest:?}"))
    };
    match word.to_ascii_lowercase().as_str() {
        "plug" => Ok(Input::Plug(true)),
        "unplug" => Ok(Input::Plug(false)),
        "battery" => rest
            .parse::<u8>()
            .ok()
            .filter(|p| *p <= 100)
            .map(Input::Battery)
            .ok_or_else(|| format!("battery needs a percentage 0..=100, got {rest:?}")),
        // raw text on purpose: invalid limits are held, not rejected
        "limit" => Ok(Input::Monitor(Command::SetLimit(rest.to_string()))),
        "unit" => Ok(Input::Monitor(Command::ToggleUnit)),
        "drag" => Ok(Input::Monitor(Command::Gesture(GestureSample::ongoing(
            number("drag")?,
        )))),
        "swipe" => Ok(Input::Monitor(Command::Gesture(GestureSample::ended(
            number("swipe")?,
        )))),
        "quit" | "exit" => Ok(Input::Monitor(Command::Quit)),
        other => Err(format!("unknown command {other:?}")),
    }
}

fn spawn_stdin_reader(commands: xch::Sender<Command>, power: Option<PowerHandle>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match parse_input(&line) {
                Ok(Input::Monitor(cmd)) => {
                    let quit = cmd == Command::Quit;
                    if commands.send(cmd).is_err() || quit {
                        break;
                    }
                }
                Ok(Input::Plug(on)) => match &power {
                    Some(h) => h.set_charging(on),
                    None => tracing::warn!("plug/unplug needs the simulated power backend"),
                },
                Ok(Input::Battery(pct)) => match &power {
                    Some(h) => h.set_battery_percent(pct),
                    None => tracing::warn!("battery needs the simulated power backend"),
                },
                Err(msg) => tracing::warn!(%msg, "ignored input line"),
            }
        }
        tracing::debug!("stdin reader finished");
    });
}

/// Power monitor for the configured backend, plus a handle when simulated.
pub fn make_power(
    cfg: &Config,
    start_charging: bool,
) -> eyre::Result<(Box<dyn PowerMonitor + Send>, Option<PowerHandle>)> {
    match cfg.power.backend {
        PowerBackend::Sim => {
            let pm = SimulatedPowerMonitor::new(
                start_charging || cfg.simulation.start_charging,
                cfg.simulation.battery_percent,
            );
            let handle = pm.handle();
            let boxed: Box<dyn PowerMonitor + Send> = Box::new(pm);
            Ok((boxed, Some(handle)))
        }
        PowerBackend::Sysfs => {
            if start_charging {
                tracing::warn!("--charging only applies to the simulated power backend");
            }
            let pm = SysfsPowerMonitor::discover().wrap_err("open sysfs power supply")?;
            tracing::info!(supply = %pm.supply().display(), "sysfs power backend");
            let boxed: Box<dyn PowerMonitor + Send> = Box::new(pm);
            Ok((boxed, None))
        }
    }
}

/// Readings of a CSV trace, normalized to Celsius.
pub fn load_trace(path: &std::path::Path) -> eyre::Result<Vec<f64>> {
    let rows = thermo_config::load_trace_csv(path)?;
    Ok(rows
        .iter()
        .map(|r| Temperature::from(r).as_celsius())
        .collect())
}

pub fn build_monitor(
    cfg: &Config,
    opts: &RunOpts,
    power: Box<dyn PowerMonitor + Send>,
) -> eyre::Result<Monitor> {
    let mut sampling: thermo_core::SamplingCfg = (&cfg.sampling).into();
    if let Some(ms) = opts.period_ms {
        sampling.period_ms = ms;
    }
    let mut limit: thermo_core::LimitCfg = (&cfg.limit).into();
    if let Some(unit) = opts.unit
        && unit != limit.unit
    {
        limit.initial = limit.default_for(unit).to_string();
        limit.unit = unit;
    }
    if let Some(text) = &opts.limit {
        limit.initial.clone_from(text);
    }

    let builder = Monitor::builder()
        .with_power(power)
        .with_sampling(sampling)
        .with_power_cfg((&cfg.power).into())
        .with_alarm((&cfg.alarm).into())
        .with_limit(limit);
    let builder = match opts.max_samples {
        Some(n) => builder.max_samples(n),
        None => builder,
    };

    let builder = if let Some(path) = &opts.trace {
        let readings = load_trace(path)?;
        tracing::info!(path = %path.display(), readings = readings.len(), "replaying trace");
        builder
            .with_source(ReplayReadingSource::new(readings))
            .stop_when_exhausted(true)
    } else {
        let sim = &cfg.simulation;
        let (ambient_c, drift_c, seed) = (sim.ambient_c, sim.drift_c, sim.seed);
        builder.with_source_factory(move || -> Result<Box<dyn ReadingSource + Send>, BoxError> {
            Ok(Box::new(SimulatedReadingSource::new(ambient_c, drift_c, seed)))
        })
    };
    builder.build()
}

pub fn run_monitor(
    cfg: &Config,
    opts: &RunOpts,
    json: bool,
    shutdown: &Arc<AtomicBool>,
) -> eyre::Result<RunSummary> {
    let (power, handle) = make_power(cfg, opts.charging)?;
    let monitor = build_monitor(cfg, opts, power)?;

    if !json {
        println!("{}", thermo_ui::render(&monitor.machine().snapshot()));
    }

    let (tx, rx) = xch::unbounded();
    if opts.no_input {
        drop(tx);
    } else {
        spawn_stdin_reader(tx, handle);
    }

    let mut printer = |effect: &Effect, snap: &Snapshot| {
        if json {
            println!("{}", effect_json(effect, snap));
        } else if let Some(line) = thermo_ui::effect_line(effect) {
            println!("{line}");
            if matches!(effect, Effect::AlarmRaised { .. })
                && let Some(lines) = thermo_ui::alarm_lines(snap)
            {
                for l in lines.iter().skip(1) {
                    println!("  {l}");
                }
            }
        }
    };
    Ok(monitor.run(&rx, shutdown, &mut printer))
}

fn temp_json(t: &Temperature) -> Value {
    json!({ "value": t.value(), "unit": t.unit().name() })
}

/// One JSON line per effect: event name, state after the event, details.
pub fn effect_json(effect: &Effect, snap: &Snapshot) -> Value {
    let (event, detail) = match effect {
        Effect::StartSampling => ("sampling_started", Value::Null),
        Effect::StopSampling => ("sampling_stopped", Value::Null),
        Effect::PhaseChanged { from, to } => (
            "phase_changed",
            json!({ "from": from.as_str(), "to": to.as_str() }),
        ),
        Effect::ChargingChanged(c) => (
            "charging_changed",
            json!({ "charging": c.is_charging() }),
        ),
        Effect::BatteryChanged(p) => ("battery_changed", json!({ "percent": p })),
        Effect::ReadingUpdated(t) => ("reading", temp_json(t)),
        Effect::AlarmRaised { reading } => ("alarm_raised", json!({ "reading": temp_json(reading) })),
        Effect::AlarmDismissed { memory } => {
            ("alarm_dismissed", json!({ "memory": temp_json(memory) }))
        }
        Effect::Resumed { reading } => ("resumed", json!({ "reading": temp_json(reading) })),
        Effect::GestureFeedback(dx) => ("gesture_feedback", json!({ "dx": dx })),
        Effect::GestureCancelled => ("gesture_cancelled", Value::Null),
        Effect::LimitChanged(l) => (
            "limit_changed",
            json!({ "text": l.text(), "unit": l.unit().name(), "valid": l.is_valid() }),
        ),
        Effect::UnitChanged(u) => ("unit_changed", json!({ "unit": u.name() })),
    };
    json!({
        "event": event,
        "phase": snap.phase.as_str(),
        "charging": snap.charging.is_charging(),
        "battery_percent": snap.battery_percent,
        "unit": snap.unit.name(),
        "reading": snap.reading.map(|t| t.value()),
        "limit": snap.limit.text(),
        "detail": detail,
    })
}

pub fn summary_json(summary: &RunSummary) -> Value {
    json!({
        "summary": {
            "samples": summary.samples,
            "alarms": summary.alarms,
            "dismissals": summary.dismissals,
            "final_phase": summary.final_phase.as_str(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plug", Input::Plug(true))]
    #[case("  UNPLUG ", Input::Plug(false))]
    #[case("battery 55", Input::Battery(55))]
    #[case("limit 86", Input::Monitor(Command::SetLimit("86".into())))]
    #[case("limit hot", Input::Monitor(Command::SetLimit("hot".into())))]
    #[case("unit", Input::Monitor(Command::ToggleUnit))]
    #[case("drag 40", Input::Monitor(Command::Gesture(GestureSample::ongoing(40.0))))]
    #[case("swipe 120.5", Input::Monitor(Command::Gesture(GestureSample::ended(120.5))))]
    #[case("quit", Input::Monitor(Command::Quit))]
    fn parses_commands(#[case] line: &str, #[case] expected: Input) {
        assert_eq!(parse_input(line).unwrap(), expected);
    }

    #[rstest]
    #[case("battery 101")]
    #[case("battery")]
    #[case("swipe far")]
    #[case("dance")]
    fn rejects_bad_lines(#[case] line: &str) {
        assert!(parse_input(line).is_err());
    }

    #[test]
    fn unit_override_resets_initial_limit() {
        let cfg = Config::default();
        let opts = RunOpts {
            unit: Some(TempUnit::Fahrenheit),
            ..RunOpts::default()
        };
        let power = Box::new(SimulatedPowerMonitor::new(false, None));
        let m = build_monitor(&cfg, &opts, power).unwrap();
        assert_eq!(m.machine().unit(), TempUnit::Fahrenheit);
        assert_eq!(m.machine().limit().text(), "86");
    }

    #[test]
    fn explicit_limit_wins_over_unit_default() {
        let cfg = Config::default();
        let opts = RunOpts {
            unit: Some(TempUnit::Fahrenheit),
            limit: Some("95".into()),
            ..RunOpts::default()
        };
        let power = Box::new(SimulatedPowerMonitor::new(false, None));
        let m = build_monitor(&cfg, &opts, power).unwrap();
        assert_eq!(m.machine().limit().text(), "95");
    }
}
