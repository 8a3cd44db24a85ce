//! Type-state builder for `Monitor`.
//!
//! `build()` is only available once a power monitor and a reading source
//! factory are set; `try_build()` works in any state and reports what is
//! missing as a typed `BuildError`.
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use thermo_traits::clock::{Clock, MonotonicClock};
use thermo_traits::{BoxError, PowerMonitor, ReadingSource};

use crate::config::{AlarmCfg, LimitCfg, PowerCfg, SamplingCfg};
use crate::error::{BuildError, Result};
use crate::machine::AlarmMachine;
use crate::runner::Monitor;
use crate::sampler::{SamplingSession, SharedClock, SourceFactory};

pub struct Missing;
pub struct Set;

pub struct MonitorBuilder<P, S> {
    power: Option<Box<dyn PowerMonitor + Send>>,
    factory: Option<SourceFactory>,
    sampling: Option<SamplingCfg>,
    power_cfg: Option<PowerCfg>,
    alarm: Option<AlarmCfg>,
    limit: Option<LimitCfg>,
    clock: Option<SharedClock>,
    max_samples: Option<u64>,
    stop_when_exhausted: bool,
    _p: PhantomData<P>,
    _s: PhantomData<S>,
}

impl Default for MonitorBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            power: None,
            factory: None,
            sampling: None,
            power_cfg: None,
            alarm: None,
            limit: None,
            clock: None,
            max_samples: None,
            stop_when_exhausted: false,
            _p: PhantomData,
            _s: PhantomData,
        }
    }
}

impl Monitor {
    /// Start building a `Monitor`.
    pub fn builder() -> MonitorBuilder<Missing, Missing> {
        MonitorBuilder::default()
    }
}

fn validate(
    sampling: &SamplingCfg,
    power: &PowerCfg,
    alarm: &AlarmCfg,
    max_samples: Option<u64>,
) -> Result<()> {
    if sampling.period_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "sampling period must be >= 1 ms",
        )));
    }
    if power.poll_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "power poll interval must be >= 1 ms",
        )));
    }
    if !alarm.hysteresis_margin_c.is_finite() || alarm.hysteresis_margin_c.is_sign_negative() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "hysteresis margin must be a finite value >= 0",
        )));
    }
    if !alarm.dismiss_distance.is_finite() || alarm.dismiss_distance <= 0.0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "dismiss distance must be a finite value > 0",
        )));
    }
    if max_samples == Some(0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "max samples must be >= 1",
        )));
    }
    Ok(())
}

impl<P, S> MonitorBuilder<P, S> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<Monitor> {
        let power = self
            .power
            .ok_or_else(|| eyre::Report::new(BuildError::MissingPower))?;
        let factory = self
            .factory
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSource))?;
        let sampling = self.sampling.unwrap_or_default();
        let power_cfg = self.power_cfg.unwrap_or_default();
        let alarm = self.alarm.unwrap_or_default();
        let limit = self.limit.unwrap_or_default();
        validate(&sampling, &power_cfg, &alarm, self.max_samples)?;

        let clock: SharedClock = self.clock.unwrap_or_else(|| Arc::new(MonotonicClock::new()));
        let session = SamplingSession::new(
            factory,
            Duration::from_millis(sampling.period_ms),
            clock.clone(),
        );
        Ok(Monitor {
            machine: AlarmMachine::new(alarm, limit),
            power: Some(power),
            power_cfg,
            sampling: session,
            clock,
            max_samples: self.max_samples,
            stop_when_exhausted: self.stop_when_exhausted,
        })
    }

    pub fn with_sampling(mut self, sampling: SamplingCfg) -> Self {
        self.sampling = Some(sampling);
        self
    }

    pub fn with_power_cfg(mut self, power: PowerCfg) -> Self {
        self.power_cfg = Some(power);
        self
    }

    pub fn with_alarm(mut self, alarm: AlarmCfg) -> Self {
        self.alarm = Some(alarm);
        self
    }

    pub fn with_limit(mut self, limit: LimitCfg) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Provide a custom clock implementation; defaults to `MonotonicClock` when not provided.
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Stop after this many samples have been delivered.
    pub fn max_samples(mut self, n: u64) -> Self {
        self.max_samples = Some(n);
        self
    }

    /// End the run when the reading source reports it has nothing left.
    pub fn stop_when_exhausted(mut self, stop: bool) -> Self {
        self.stop_when_exhausted = stop;
        self
    }
}

impl<S> MonitorBuilder<Missing, S> {
    pub fn with_power(self, power: impl PowerMonitor + Send + 'static) -> MonitorBuilder<Set, S> {
        MonitorBuilder {
            power: Some(Box::new(power)),
            factory: self.factory,
            sampling: self.sampling,
            power_cfg: self.power_cfg,
            alarm: self.alarm,
            limit: self.limit,
            clock: self.clock,
            max_samples: self.max_samples,
            stop_when_exhausted: self.stop_when_exhausted,
            _p: PhantomData,
            _s: PhantomData,
        }
    }
}

impl<P> MonitorBuilder<P, Missing> {
    /// Factory called at the start of every sampling session.
    pub fn with_source_factory<F>(self, factory: F) -> MonitorBuilder<P, Set>
    where
        F: FnMut() -> std::result::Result<Box<dyn ReadingSource + Send>, BoxError> + Send + 'static,
    {
        MonitorBuilder {
            power: self.power,
            factory: Some(Box::new(factory)),
            sampling: self.sampling,
            power_cfg: self.power_cfg,
            alarm: self.alarm,
            limit: self.limit,
            clock: self.clock,
            max_samples: self.max_samples,
            stop_when_exhausted: self.stop_when_exhausted,
            _p: PhantomData,
            _s: PhantomData,
        }
    }

    /// Every session starts from a fresh clone of `source`.
    pub fn with_source<R>(self, source: R) -> MonitorBuilder<P, Set>
    where
        R: ReadingSource + Clone + Send + 'static,
    {
        self.with_source_factory(move || Ok(Box::new(source.clone()) as Box<dyn ReadingSource + Send>))
    }
}

impl MonitorBuilder<Set, Set> {
    /// Validate and build the Monitor. Only available when power and source are set.
    pub fn build(self) -> Result<Monitor> {
        self.try_build()
    }
}
