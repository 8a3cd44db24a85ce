use crossbeam_channel as xch;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thermo_traits::PowerMonitor;
use thermo_traits::clock::Clock;

use crate::config::PowerCfg;
use crate::gesture::GestureSample;
use crate::machine::{AlarmMachine, Effect, Event};
use crate::observer::Observer;
use crate::power::{PowerWatch, status_events};
use crate::sampler::{SamplingSession, SharedClock};
use crate::status::Phase;
use crate::units::Temperature;

/// How often the loop wakes without input to check the shutdown flag and
/// the stall warning.
const IDLE_TICK: Duration = Duration::from_millis(100);

/// Presentation-side input for the decision loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetLimit(String),
    ToggleUnit,
    Gesture(GestureSample),
    Quit,
}

impl Command {
    fn into_event(self) -> Option<Event> {
        match self {
            Self::SetLimit(text) => Some(Event::SetLimit(text)),
            Self::ToggleUnit => Some(Event::ToggleUnit),
            Self::Gesture(s) => Some(Event::Gesture(s)),
            Self::Quit => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub samples: u64,
    pub alarms: u64,
    pub dismissals: u64,
    pub final_phase: Phase,
}

/// Stall warning threshold: four missed periods.
#[inline]
pub(crate) fn stall_threshold_ms(period_ms: u64) -> u64 {
    period_ms.saturating_mul(4).max(1)
}

/// The decision loop: owns the machine, the power monitor and the sampling
/// session. Build one with [`Monitor::builder`](crate::Monitor::builder).
pub struct Monitor {
    pub(crate) machine: AlarmMachine,
    /// Moved onto the watch thread when `run` starts.
    pub(crate) power: Option<Box<dyn PowerMonitor + Send>>,
    pub(crate) power_cfg: PowerCfg,
    pub(crate) sampling: SamplingSession,
    pub(crate) clock: SharedClock,
    pub(crate) max_samples: Option<u64>,
    pub(crate) stop_when_exhausted: bool,
}

impl core::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Monitor")
            .field("machine", &self.machine)
            .field("power_cfg", &self.power_cfg)
            .field("max_samples", &self.max_samples)
            .field("stop_when_exhausted", &self.stop_when_exhausted)
            .finish_non_exhaustive()
    }
}

struct LoopState {
    summary: RunSummary,
    stall_warned: bool,
}

impl Monitor {
    pub fn machine(&self) -> &AlarmMachine {
        &self.machine
    }

    /// Run until `Command::Quit`, the shutdown flag, `max_samples` samples,
    /// or (when configured) the reading source running dry.
    pub fn run(
        mut self,
        commands: &xch::Receiver<Command>,
        shutdown: &AtomicBool,
        observer: &mut dyn Observer,
    ) -> RunSummary {
        let poll = Duration::from_millis(self.power_cfg.poll_ms);
        let watch = self.power.take().map(|p| PowerWatch::spawn(p, poll));
        let mut power_rx = watch
            .as_ref()
            .map_or_else(xch::never, |w| w.receiver().clone());
        let mut commands = commands.clone();
        let mut state = LoopState {
            summary: RunSummary {
                samples: 0,
                alarms: 0,
                dismissals: 0,
                final_phase: self.machine.phase(),
            },
            stall_warned: false,
        };
        tracing::info!(phase = %self.machine.phase(), limit = self.machine.limit().text(), unit = %self.machine.unit(), "monitor start");

        loop {
            if shutdown.load(Ordering::Relaxed) {
                tracing::info!("shutdown requested");
                break;
            }
            let sample_rx = self
                .sampling
                .sampler()
                .map_or_else(xch::never, |s| s.receiver().clone());

            xch::select! {
                recv(power_rx) -> msg => match msg {
                    Ok(status) => {
                        for ev in status_events(status) {
                            self.dispatch(ev, observer, &mut state);
                        }
                    }
                    Err(_) => {
                        tracing::warn!("power watch ended; charging state frozen");
                        power_rx = xch::never();
                    }
                },
                recv(sample_rx) -> msg => match msg {
                    Ok(celsius) => {
                        state.summary.samples += 1;
                        self.dispatch(Event::Sample(Temperature::celsius(celsius)), observer, &mut state);
                        if self.max_samples.is_some_and(|max| state.summary.samples >= max) {
                            tracing::info!(samples = state.summary.samples, "sample budget reached");
                            break;
                        }
                    }
                    Err(_) => {
                        self.sampling.stop();
                        if self.stop_when_exhausted {
                            tracing::info!("reading source ended; stopping");
                            break;
                        }
                    }
                },
                recv(commands) -> msg => match msg {
                    Ok(cmd) => match cmd.into_event() {
                        Some(ev) => self.dispatch(ev, observer, &mut state),
                        None => {
                            tracing::info!("quit requested");
                            break;
                        }
                    },
                    Err(_) => commands = xch::never(),
                },
                default(IDLE_TICK) => self.check_stall(&mut state),
            }
        }

        self.sampling.stop();
        drop(watch);
        state.summary.final_phase = self.machine.phase();
        tracing::info!(
            samples = state.summary.samples,
            alarms = state.summary.alarms,
            dismissals = state.summary.dismissals,
            phase = %state.summary.final_phase,
            "monitor stop"
        );
        state.summary
    }

    fn dispatch(&mut self, event: Event, observer: &mut dyn Observer, state: &mut LoopState) {
        let effects = self.machine.handle(event);
        for fx in &effects {
            match fx {
                Effect::StartSampling => {
                    state.stall_warned = false;
                    self.sampling.start();
                }
                Effect::StopSampling => self.sampling.stop(),
                Effect::AlarmRaised { .. } => state.summary.alarms += 1,
                Effect::AlarmDismissed { .. } => state.summary.dismissals += 1,
                _ => {}
            }
        }
        if effects.is_empty() {
            return;
        }
        let snapshot = self.machine.snapshot();
        for fx in &effects {
            observer.observe(fx, &snapshot);
        }
    }

    fn check_stall(&self, state: &mut LoopState) {
        let Some(sampler) = self.sampling.sampler() else {
            return;
        };
        let threshold = stall_threshold_ms(self.sampling.period().as_millis() as u64);
        let now_ms = self.clock.ms_since(sampler.epoch());
        let stalled = sampler.stalled_for(now_ms);
        if stalled > threshold && !state.stall_warned {
            tracing::warn!(stalled_ms = stalled, threshold_ms = threshold, "no temperature sample received");
            state.stall_warned = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stall_threshold_is_four_periods() {
        assert_eq!(stall_threshold_ms(2_000), 8_000);
        assert_eq!(stall_threshold_ms(0), 1);
        assert_eq!(stall_threshold_ms(u64::MAX), u64::MAX);
    }

    #[test]
    fn quit_has_no_event() {
        assert_eq!(Command::Quit.into_event(), None);
        assert_eq!(
            Command::SetLimit("31".into()).into_event(),
            Some(Event::SetLimit("31".into()))
        );
    }
}
