//! Presentation hook for the decision loop.

use crate::machine::{Effect, Snapshot};

/// Receives every effect, in order, together with the machine state right
/// after the event that produced it.
pub trait Observer {
    fn observe(&mut self, effect: &Effect, snapshot: &Snapshot);
}

impl<F: FnMut(&Effect, &Snapshot)> Observer for F {
    fn observe(&mut self, effect: &Effect, snapshot: &Snapshot) {
        self(effect, snapshot)
    }
}
