//! Phase and charging state of the alarm machine.

use std::fmt;

/// Operating mode of the alarm machine. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Not charging; no sampling.
    #[default]
    Idle,
    /// Charging; every sample is checked against the limit.
    Monitoring,
    /// Limit crossed; waiting for a dismiss or for the charger to go away.
    Alarming,
    /// Dismissed; samples only checked against the hysteresis bound.
    Paused,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Monitoring => "monitoring",
            Self::Alarming => "alarming",
            Self::Paused => "paused",
        }
    }

    /// Whether a sampling session should be running in this phase.
    pub fn samples(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChargingState {
    #[default]
    NotCharging,
    Charging,
}

impl From<bool> for ChargingState {
    fn from(charging: bool) -> Self {
        if charging {
            Self::Charging
        } else {
            Self::NotCharging
        }
    }
}

impl ChargingState {
    pub fn is_charging(self) -> bool {
        matches!(self, Self::Charging)
    }
}
