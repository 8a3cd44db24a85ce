//! Test and helper mocks for thermo_core

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use thermo_traits::{BoxError, PowerMonitor, PowerStatus, ReadingSource};

use crate::machine::{Effect, Snapshot};
use crate::observer::Observer;

/// A reading source that always errors; sessions built on it never deliver.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSource;

impl ReadingSource for NoopSource {
    fn read(&mut self) -> Result<f64, BoxError> {
        Err(Box::new(std::io::Error::other("noop source")))
    }
}

/// A power monitor that always errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailablePower;

impl PowerMonitor for UnavailablePower {
    fn poll(&mut self) -> Result<PowerStatus, BoxError> {
        Err(Box::new(std::io::Error::other("no power supply")))
    }
}

/// Yields the scripted statuses in order, then keeps repeating the last one.
#[derive(Debug, Clone)]
pub struct ScriptedPower {
    script: VecDeque<PowerStatus>,
    last: PowerStatus,
}

impl ScriptedPower {
    pub fn new(script: impl IntoIterator<Item = PowerStatus>) -> Self {
        Self {
            script: script.into_iter().collect(),
            last: PowerStatus {
                charging: false,
                battery_percent: None,
            },
        }
    }

    /// Plugged in from the first poll on.
    pub fn charging() -> Self {
        Self::new([PowerStatus {
            charging: true,
            battery_percent: None,
        }])
    }
}

impl PowerMonitor for ScriptedPower {
    fn poll(&mut self) -> Result<PowerStatus, BoxError> {
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        Ok(self.last)
    }
}

/// Observer that keeps every effect with its snapshot; clones share storage.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    seen: Arc<Mutex<Vec<(Effect, Snapshot)>>>,
}

impl Recorder {
    pub fn effects(&self) -> Vec<Effect> {
        self.seen
            .lock()
            .map(|v| v.iter().map(|(e, _)| e.clone()).collect())
            .unwrap_or_default()
    }

    pub fn last_snapshot(&self) -> Option<Snapshot> {
        self.seen
            .lock()
            .ok()
            .and_then(|v| v.last().map(|(_, s)| s.clone()))
    }
}

impl Observer for Recorder {
    fn observe(&mut self, effect: &Effect, snapshot: &Snapshot) {
        if let Ok(mut v) = self.seen.lock() {
            v.push((effect.clone(), snapshot.clone()));
        }
    }
}
