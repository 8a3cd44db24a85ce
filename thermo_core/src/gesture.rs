//! Swipe-to-dismiss interpretation.
//!
//! Intermediate samples only drive live feedback. The decision is taken
//! once, from the displacement carried by the terminating sample; a swipe
//! that crossed the threshold and came back counts as a cancel.

/// Default rightward displacement needed to dismiss.
pub const DEFAULT_DISMISS_DISTANCE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Ongoing,
    Ended,
}

/// Horizontal displacement since the gesture began, positive to the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub dx: f64,
    pub phase: GesturePhase,
}

impl GestureSample {
    pub fn ongoing(dx: f64) -> Self {
        Self {
            dx,
            phase: GesturePhase::Ongoing,
        }
    }

    pub fn ended(dx: f64) -> Self {
        Self {
            dx,
            phase: GesturePhase::Ended,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureDecision {
    /// Live offset for rendering only.
    Feedback(f64),
    Dismiss,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct DismissGesture {
    distance: f64,
    offset: f64,
}

impl Default for DismissGesture {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_DISTANCE)
    }
}

impl DismissGesture {
    pub fn new(distance: f64) -> Self {
        Self {
            distance,
            offset: 0.0,
        }
    }

    /// Current live offset; zero between gestures.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
    }

    pub fn feed(&mut self, sample: GestureSample) -> GestureDecision {
        match sample.phase {
            GesturePhase::Ongoing => {
                self.offset = sample.dx;
                GestureDecision::Feedback(sample.dx)
            }
            GesturePhase::Ended => {
                self.offset = 0.0;
                if sample.dx > self.distance {
                    GestureDecision::Dismiss
                } else {
                    GestureDecision::Cancel
                }
            }
        }
    }
}
