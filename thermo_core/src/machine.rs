//! The alarm state machine (`AlarmMachine`).
//!
//! ```text
//!            Charging                 sample > limit
//!  Idle ─────────────────► Monitoring ──────────────► Alarming
//!   ▲                        ▲                          │
//!   │                        │ sample >= memory+margin  │ Dismiss
//!   │                        └──────── Paused ◄─────────┘
//!   │       NotCharging (any phase)     │
//!   └───────────────────────────────────┘
//! ```
//!
//! Every input goes through [`AlarmMachine::handle`], which fully applies the
//! event and returns the resulting [`Effect`]s before the caller can feed the
//! next one. Events that do not apply to the current phase are no-ops and
//! return no effects.

use crate::config::{AlarmCfg, LimitCfg};
use crate::gesture::{DismissGesture, GestureDecision, GestureSample};
use crate::hysteresis::should_resume;
use crate::status::{ChargingState, Phase};
use crate::threshold::{Limit, evaluate};
use crate::units::{TempUnit, Temperature};

/// Inputs accepted by the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Charging(ChargingState),
    /// Battery level in percent; informational only.
    Battery(u8),
    Sample(Temperature),
    Gesture(GestureSample),
    SetLimit(String),
    ToggleUnit,
}

/// What happened as a result of one event.
///
/// `StartSampling`/`StopSampling` are instructions for the owner of the
/// sampling session; the rest are notifications for presentation, with
/// temperatures in the display unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartSampling,
    StopSampling,
    PhaseChanged { from: Phase, to: Phase },
    ChargingChanged(ChargingState),
    BatteryChanged(u8),
    ReadingUpdated(Temperature),
    AlarmRaised { reading: Temperature },
    AlarmDismissed { memory: Temperature },
    Resumed { reading: Temperature },
    GestureFeedback(f64),
    GestureCancelled,
    LimitChanged(Limit),
    UnitChanged(TempUnit),
}

pub type Effects = Vec<Effect>;

/// Read-only copy of everything presentation needs to render.
///
/// Temperatures are expressed in the display unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub phase: Phase,
    pub charging: ChargingState,
    pub battery_percent: Option<u8>,
    pub reading: Option<Temperature>,
    pub unit: TempUnit,
    pub limit: Limit,
    pub alarm_memory: Option<Temperature>,
    pub gesture_offset: f64,
}

impl Snapshot {
    /// The full-screen alarm is shown only while alarming on the charger.
    pub fn alarm_visible(&self) -> bool {
        self.phase == Phase::Alarming && self.charging.is_charging()
    }
}

#[derive(Debug, Clone)]
pub struct AlarmMachine {
    phase: Phase,
    charging: ChargingState,
    battery_percent: Option<u8>,
    reading: Option<Temperature>,
    unit: TempUnit,
    limit: Limit,
    alarm_memory: Option<Temperature>,
    gesture: DismissGesture,
    alarm: AlarmCfg,
    limits: LimitCfg,
}

impl Default for AlarmMachine {
    fn default() -> Self {
        Self::new(AlarmCfg::default(), LimitCfg::default())
    }
}

impl AlarmMachine {
    pub fn new(alarm: AlarmCfg, limits: LimitCfg) -> Self {
        let unit = limits.unit;
        Self {
            phase: Phase::Idle,
            charging: ChargingState::NotCharging,
            battery_percent: None,
            reading: None,
            unit,
            limit: Limit::new(limits.initial.clone(), unit),
            alarm_memory: None,
            gesture: DismissGesture::new(alarm.dismiss_distance),
            alarm,
            limits,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn charging(&self) -> ChargingState {
        self.charging
    }

    pub fn battery_percent(&self) -> Option<u8> {
        self.battery_percent
    }

    /// Latest reading in the display unit.
    pub fn reading(&self) -> Option<Temperature> {
        self.reading.map(|t| t.in_unit(self.unit))
    }

    pub fn unit(&self) -> TempUnit {
        self.unit
    }

    pub fn limit(&self) -> &Limit {
        &self.limit
    }

    /// Reading recorded when the alarm fired or was dismissed, as recorded.
    pub fn alarm_memory(&self) -> Option<Temperature> {
        self.alarm_memory
    }

    pub fn gesture_offset(&self) -> f64 {
        self.gesture.offset()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            charging: self.charging,
            battery_percent: self.battery_percent,
            reading: self.reading(),
            unit: self.unit,
            limit: self.limit.clone(),
            alarm_memory: self.alarm_memory.map(|t| t.in_unit(self.unit)),
            gesture_offset: self.gesture.offset(),
        }
    }

    /// Apply one event and report what changed.
    pub fn handle(&mut self, event: Event) -> Effects {
        match event {
            Event::Charging(state) => self.on_charging(state),
            Event::Battery(pct) => self.on_battery(pct),
            Event::Sample(t) => self.on_sample(t),
            Event::Gesture(s) => self.feed_gesture(s).1,
            Event::SetLimit(text) => self.set_limit(text),
            Event::ToggleUnit => self.toggle_unit(),
        }
    }

    /// Replace the limit text. Unparseable text is kept but disables alarming.
    pub fn set_limit(&mut self, text: impl Into<String>) -> Effects {
        self.limit = Limit::new(text, self.unit);
        if !self.limit.is_valid() {
            tracing::debug!(text = self.limit.text(), "limit does not parse; alarming disabled");
        }
        vec![Effect::LimitChanged(self.limit.clone())]
    }

    /// Switch the display unit. The limit is reset to the new unit's default
    /// text rather than converted.
    pub fn toggle_unit(&mut self) -> Effects {
        self.unit = self.unit.toggled();
        self.limit = Limit::new(self.limits.default_for(self.unit), self.unit);
        tracing::debug!(unit = %self.unit, limit = self.limit.text(), "unit toggled");
        vec![
            Effect::UnitChanged(self.unit),
            Effect::LimitChanged(self.limit.clone()),
        ]
    }

    /// Feed one gesture sample. Returns the interpreter's decision along
    /// with the effects it caused; a Dismiss outside Alarming is ignored.
    pub fn feed_gesture(&mut self, sample: GestureSample) -> (GestureDecision, Effects) {
        let decision = self.gesture.feed(sample);
        let effects = match decision {
            GestureDecision::Feedback(dx) => vec![Effect::GestureFeedback(dx)],
            GestureDecision::Cancel => vec![Effect::GestureCancelled],
            GestureDecision::Dismiss if self.phase == Phase::Alarming => self.dismiss(),
            GestureDecision::Dismiss => {
                tracing::debug!(phase = %self.phase, "dismiss ignored outside alarm");
                vec![Effect::GestureCancelled]
            }
        };
        (decision, effects)
    }

    fn on_charging(&mut self, state: ChargingState) -> Effects {
        if state == self.charging {
            tracing::debug!(?state, phase = %self.phase, "duplicate charging event ignored");
            return Vec::new();
        }
        self.charging = state;
        let mut effects = vec![Effect::ChargingChanged(state)];

        match state {
            ChargingState::Charging => {
                if self.phase == Phase::Idle {
                    self.alarm_memory = None;
                    self.transition(Phase::Monitoring, &mut effects);
                    effects.push(Effect::StartSampling);
                }
            }
            ChargingState::NotCharging => {
                if self.phase != Phase::Idle {
                    self.alarm_memory = None;
                    self.reading = None;
                    self.gesture.reset();
                    effects.push(Effect::StopSampling);
                    self.transition(Phase::Idle, &mut effects);
                }
            }
        }
        effects
    }

    fn on_battery(&mut self, pct: u8) -> Effects {
        if self.battery_percent == Some(pct) {
            return Vec::new();
        }
        self.battery_percent = Some(pct);
        vec![Effect::BatteryChanged(pct)]
    }

    fn on_sample(&mut self, t: Temperature) -> Effects {
        if !self.phase.samples() {
            tracing::debug!(reading = %t, "sample ignored while idle");
            return Vec::new();
        }
        tracing::trace!(reading = %t, phase = %self.phase, "sample");
        self.reading = Some(t);
        let mut effects = vec![Effect::ReadingUpdated(t.in_unit(self.unit))];

        match self.phase {
            Phase::Monitoring => match evaluate(&t, &self.limit) {
                Some(true) => {
                    self.alarm_memory = Some(t);
                    tracing::info!(reading = %t, limit = self.limit.text(), unit = %self.limit.unit(), "temperature limit exceeded");
                    self.transition(Phase::Alarming, &mut effects);
                    effects.push(Effect::AlarmRaised {
                        reading: t.in_unit(self.unit),
                    });
                }
                Some(false) => {}
                None => {
                    tracing::debug!(limit = self.limit.text(), "no valid limit; skipping evaluation");
                }
            },
            Phase::Paused => {
                let resume = self
                    .alarm_memory
                    .is_none_or(|m| should_resume(&t, &m, self.alarm.hysteresis_margin_c));
                if resume {
                    tracing::info!(reading = %t, memory = ?self.alarm_memory, "reading reached the resume bound; monitoring resumed");
                    self.alarm_memory = None;
                    self.transition(Phase::Monitoring, &mut effects);
                    effects.push(Effect::Resumed {
                        reading: t.in_unit(self.unit),
                    });
                }
            }
            // readout only
            Phase::Alarming | Phase::Idle => {}
        }
        effects
    }

    fn dismiss(&mut self) -> Effects {
        // Alarming always holds a reading; memory is the fallback for safety.
        let Some(memory) = self.reading.or(self.alarm_memory) else {
            return vec![Effect::GestureCancelled];
        };
        self.alarm_memory = Some(memory);
        tracing::info!(memory = %memory, "alarm dismissed; paused until the resume bound");
        let mut effects = Vec::new();
        self.transition(Phase::Paused, &mut effects);
        effects.push(Effect::AlarmDismissed {
            memory: memory.in_unit(self.unit),
        });
        effects
    }

    fn transition(&mut self, to: Phase, effects: &mut Effects) {
        let from = self.phase;
        self.phase = to;
        tracing::debug!(%from, %to, "phase transition");
        effects.push(Effect::PhaseChanged { from, to });
    }
}
