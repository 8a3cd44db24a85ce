#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Charging thermal alarm (hardware-agnostic).
//!
//! This crate provides the decision logic that watches battery temperature
//! while a charger is connected. All device access goes through the
//! `thermo_traits::PowerMonitor` and `thermo_traits::ReadingSource` traits.
//!
//! ## Architecture
//!
//! - **Units**: Celsius/Fahrenheit conversion and `Temperature` (`units`)
//! - **Threshold**: limit text parsing and the strict over-limit check (`threshold`)
//! - **Hysteresis**: re-arm check while the alarm is paused (`hysteresis`)
//! - **Gesture**: swipe-to-dismiss interpretation (`gesture`)
//! - **State machine**: Idle / Monitoring / Alarming / Paused (`machine`)
//! - **Threads**: sampling session and power watch (`sampler`, `power`)
//! - **Loop**: `Monitor` multiplexes power, samples and commands (`runner`)
//!
//! All comparisons happen in Celsius; the display unit only affects how
//! readings and the limit are presented and entered.

pub mod builder;
pub mod config;
pub mod conversions;
pub mod error;
pub mod gesture;
pub mod hw_error;
pub mod hysteresis;
pub mod machine;
pub mod mocks;
pub mod observer;
pub mod power;
pub mod runner;
pub mod sampler;
pub mod status;
pub mod threshold;
pub mod units;

pub use builder::MonitorBuilder;
pub use config::{AlarmCfg, LimitCfg, PowerCfg, SamplingCfg};
pub use error::{BuildError, MonitorError, Result};
pub use gesture::{DismissGesture, GestureDecision, GesturePhase, GestureSample};
pub use machine::{AlarmMachine, Effect, Event, Snapshot};
pub use observer::Observer;
pub use runner::{Command, Monitor, RunSummary};
pub use status::{ChargingState, Phase};
pub use threshold::Limit;
pub use units::{TempUnit, Temperature};
