use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Time source for sample timestamps and stall checks.
///
/// No `sleep` here: sampling threads wait on their shutdown channel.
pub trait Clock {
    fn now(&self) -> Instant;

    /// Milliseconds elapsed since `epoch`; 0 if `epoch` is in the future.
    fn ms_since(&self, epoch: Instant) -> u64 {
        let ms = self.now().saturating_duration_since(epoch).as_millis();
        u64::try_from(ms).unwrap_or(u64::MAX)
    }
}

/// Wall-clock-independent real time (`Instant::now`).
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    #[inline]
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Clock that stands still until told to move. Clones share one timeline,
/// so a test can keep a handle while a sampler thread owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut e) = self.elapsed.lock() {
            *e = e.saturating_add(by);
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let elapsed = self.elapsed.lock().map_or(Duration::ZERO, |e| *e);
        self.start + elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_only_moves_when_advanced() {
        let clock = ManualClock::new();
        let epoch = clock.now();
        assert_eq!(clock.ms_since(epoch), 0);
        clock.advance_ms(2_000);
        assert_eq!(clock.ms_since(epoch), 2_000);
    }

    #[test]
    fn clones_share_one_timeline() {
        let a = ManualClock::new();
        let b = a.clone();
        let epoch = a.now();
        b.advance(Duration::from_millis(5));
        assert_eq!(a.ms_since(epoch), 5);
    }

    #[test]
    fn future_epoch_saturates() {
        let clock = ManualClock::new();
        clock.advance_ms(10);
        let later = clock.now();
        let fresh = ManualClock::new();
        assert_eq!(fresh.ms_since(later + Duration::from_secs(1)), 0);
    }

    #[test]
    fn shared_clock_forwards() {
        let inner = ManualClock::new();
        let shared: Arc<dyn Clock + Send + Sync> = Arc::new(inner.clone());
        let epoch = shared.now();
        inner.advance_ms(7);
        assert_eq!(shared.ms_since(epoch), 7);
    }
}
