#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Text rendering of the alarm state for terminals and logs.
//!
//! Everything here is a pure function of a `Snapshot` or an `Effect`; the
//! caller decides where the text goes.

use thermo_core::{ChargingState, Effect, Limit, Phase, Snapshot, TempUnit, Temperature};

pub const TITLE: &str = "Temperature Alarm";
pub const CONNECT_CHARGER: &str = "Connect charger to start monitoring";
pub const ALARM_TITLE: &str = "Battery Temperature Limit Reached!";
pub const SWIPE_HINT: &str = "Swipe Right to Dismiss";
pub const UNPLUG_HINT: &str = "Or disconnect charger to stop";

/// One decimal plus the unit symbol; `--` when there is no reading yet.
pub fn temperature_text(reading: Option<Temperature>, unit: TempUnit) -> String {
    match reading {
        Some(t) => t.in_unit(unit).to_string(),
        None => format!("--{}", unit.symbol()),
    }
}

pub fn battery_text(percent: Option<u8>) -> String {
    match percent {
        Some(p) => format!("Battery Level: {p}%"),
        None => "Battery Level: Loading...".to_string(),
    }
}

pub fn limit_prompt(limit: &Limit) -> String {
    format!("Set Limit ({}): {}", limit.unit(), limit.text())
}

pub fn toggle_label(unit: TempUnit) -> String {
    format!("Switch to {}", unit.toggled())
}

/// Main screen, top to bottom.
pub fn main_lines(snap: &Snapshot) -> Vec<String> {
    let mut lines = vec![TITLE.to_string()];
    match snap.charging {
        ChargingState::NotCharging => lines.push(CONNECT_CHARGER.to_string()),
        ChargingState::Charging => {
            lines.push(battery_text(snap.battery_percent));
            lines.push(format!(
                "Temperature: {}",
                temperature_text(snap.reading, snap.unit)
            ));
        }
    }
    lines.push(limit_prompt(&snap.limit));
    if !snap.limit.is_valid() {
        lines.push("(limit is not a number; alarm disabled)".to_string());
    }
    if snap.phase == Phase::Paused
        && let Some(m) = snap.alarm_memory
    {
        lines.push(format!("Alarm dismissed at {m}; watching for further rise"));
    }
    lines.push(toggle_label(snap.unit));
    lines
}

/// Full-screen alarm, or `None` when it should not be shown.
pub fn alarm_lines(snap: &Snapshot) -> Option<Vec<String>> {
    if !snap.alarm_visible() {
        return None;
    }
    let mut swipe = SWIPE_HINT.to_string();
    if snap.gesture_offset > 0.0 {
        swipe = format!("{swipe} ({:.0})", snap.gesture_offset);
    }
    Some(vec![
        ALARM_TITLE.to_string(),
        format!(
            "Current Temperature: {}",
            temperature_text(snap.reading, snap.unit)
        ),
        swipe,
        UNPLUG_HINT.to_string(),
    ])
}

/// Whatever the user would currently be looking at.
pub fn render(snap: &Snapshot) -> String {
    alarm_lines(snap)
        .unwrap_or_else(|| main_lines(snap))
        .join("\n")
}

/// One-line notice for an effect; `None` for effects with nothing to say.
pub fn effect_line(effect: &Effect) -> Option<String> {
    let line = match effect {
        Effect::StartSampling | Effect::StopSampling | Effect::GestureCancelled => return None,
        Effect::PhaseChanged { from, to } => format!("phase: {from} -> {to}"),
        Effect::ChargingChanged(ChargingState::Charging) => "charger connected".to_string(),
        Effect::ChargingChanged(ChargingState::NotCharging) => "charger disconnected".to_string(),
        Effect::BatteryChanged(p) => battery_text(Some(*p)),
        Effect::ReadingUpdated(t) => format!("Temperature: {t}"),
        Effect::AlarmRaised { reading } => format!("ALARM: {ALARM_TITLE} ({reading})"),
        Effect::AlarmDismissed { memory } => format!("alarm dismissed at {memory}"),
        Effect::Resumed { reading } => format!("monitoring resumed at {reading}"),
        Effect::GestureFeedback(dx) => format!("swipe {dx:.0}"),
        Effect::LimitChanged(limit) if limit.is_valid() => {
            format!("limit: {} {}", limit.text(), limit.unit().symbol())
        }
        Effect::LimitChanged(limit) => {
            format!("limit: {:?} is not a number; alarm disabled", limit.text())
        }
        Effect::UnitChanged(unit) => format!("unit: {unit}"),
    };
    Some(line)
}
