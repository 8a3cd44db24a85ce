pub mod error;
pub mod sysfs;

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thermo_traits::{BoxError, PowerMonitor, PowerStatus, ReadingSource};

use crate::error::HwError;

pub use sysfs::SysfsPowerMonitor;

/// Battery level reported when the simulator was never told otherwise.
const UNKNOWN_BATTERY: u8 = u8::MAX;

/// Simulated temperature source: a random walk that starts at ambient and
/// climbs while charging.
///
/// Each read adds `uniform(0, 1) + drift_c`; with the default drift of -0.2
/// the walk rises by 0.3 °C per sample on average.
pub struct SimulatedReadingSource {
    current_c: f64,
    drift_c: f64,
    rng: ChaCha8Rng,
}

impl SimulatedReadingSource {
    pub fn new(ambient_c: f64, drift_c: f64, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        tracing::debug!(ambient_c, drift_c, seed, "simulated reading source");
        Self {
            current_c: ambient_c,
            drift_c,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl ReadingSource for SimulatedReadingSource {
    fn read(&mut self) -> Result<f64, BoxError> {
        let step: f64 = self.rng.random();
        self.current_c += step + self.drift_c;
        tracing::trace!(celsius = self.current_c, "simulated sample");
        Ok(self.current_c)
    }
}

/// Replays a fixed list of Celsius readings, then reports exhaustion.
#[derive(Debug, Clone)]
pub struct ReplayReadingSource {
    remaining: VecDeque<f64>,
}

impl ReplayReadingSource {
    pub fn new(readings_c: impl IntoIterator<Item = f64>) -> Self {
        Self {
            remaining: readings_c.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

impl ReadingSource for ReplayReadingSource {
    fn read(&mut self) -> Result<f64, BoxError> {
        self.remaining
            .pop_front()
            .ok_or_else(|| Box::new(HwError::TraceExhausted) as BoxError)
    }
}

/// Shared switchboard for a [`SimulatedPowerMonitor`]; clone it to plug,
/// unplug or change the battery level from another thread.
#[derive(Debug, Clone)]
pub struct PowerHandle {
    charging: Arc<AtomicBool>,
    battery: Arc<AtomicU8>,
}

impl PowerHandle {
    pub fn set_charging(&self, charging: bool) {
        self.charging.store(charging, Ordering::Relaxed);
    }

    pub fn is_charging(&self) -> bool {
        self.charging.load(Ordering::Relaxed)
    }

    /// Values above 100 are clamped.
    pub fn set_battery_percent(&self, pct: u8) {
        self.battery.store(pct.min(100), Ordering::Relaxed);
    }
}

/// Simulated power monitor
pub struct SimulatedPowerMonitor {
    handle: PowerHandle,
}

impl SimulatedPowerMonitor {
    pub fn new(charging: bool, battery_percent: Option<u8>) -> Self {
        let battery = battery_percent.map_or(UNKNOWN_BATTERY, |p| p.min(100));
        Self {
            handle: PowerHandle {
                charging: Arc::new(AtomicBool::new(charging)),
                battery: Arc::new(AtomicU8::new(battery)),
            },
        }
    }

    pub fn handle(&self) -> PowerHandle {
        self.handle.clone()
    }
}

impl PowerMonitor for SimulatedPowerMonitor {
    fn poll(&mut self) -> Result<PowerStatus, BoxError> {
        let battery = self.handle.battery.load(Ordering::Relaxed);
        Ok(PowerStatus {
            charging: self.handle.is_charging(),
            battery_percent: (battery != UNKNOWN_BATTERY).then_some(battery),
        })
    }
}
