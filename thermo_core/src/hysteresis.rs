//! Re-arm check while the alarm is paused.

use crate::units::Temperature;

/// Default gap (°C) between the dismiss-time reading and a resuming sample.
pub const DEFAULT_MARGIN_C: f64 = 1.0;

/// True once `current` has reached `memory + margin_c`, compared in Celsius.
///
/// Stateless; the alarm machine owns the memory and calls this on every
/// sample while paused.
#[inline]
pub fn should_resume(current: &Temperature, memory: &Temperature, margin_c: f64) -> bool {
    current.as_celsius() >= memory.as_celsius() + margin_c
}
