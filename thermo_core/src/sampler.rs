//! Background temperature sampling.
//!
//! A `Sampler` owns one `ReadingSource` on its own thread and pushes Celsius
//! readings through a bounded channel once per period, tracking the last-ok
//! timestamp for the stall warning.
//!
//! Each `Sampler` spawns exactly one thread, shut down and joined when the
//! `Sampler` is dropped. Waiting happens on the shutdown channel, so a drop
//! never has to sit out the remainder of a period.
use crossbeam_channel as xch;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thermo_traits::clock::Clock;
use thermo_traits::{BoxError, ReadingSource};

use crate::error::MonitorError;
use crate::hw_error::map_collaborator_error;

pub struct Sampler {
    rx: xch::Receiver<f64>,
    last_ok: Arc<AtomicU64>,
    epoch: Instant,
    /// Dropping the sender wakes the thread out of its wait.
    shutdown: Option<xch::Sender<()>>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Sampler {
    /// Start sampling. The first reading is taken one `period` after spawn.
    pub fn spawn<S, C>(mut source: S, period: Duration, clock: C) -> Self
    where
        S: ReadingSource + Send + 'static,
        C: Clock + Send + 'static,
    {
        let (tx, rx) = xch::bounded(1);
        let (shutdown_tx, shutdown_rx) = xch::bounded::<()>(0);
        let last_ok = Arc::new(AtomicU64::new(0));
        let last_ok_clone = last_ok.clone();
        let epoch = clock.now();

        let join_handle = std::thread::spawn(move || {
            let mut failing = false;
            loop {
                match shutdown_rx.recv_timeout(period) {
                    Err(xch::RecvTimeoutError::Timeout) => {}
                    // explicit signal or sender dropped
                    _ => {
                        tracing::debug!("sampler thread received shutdown signal");
                        break;
                    }
                }

                let celsius = match source.read() {
                    Ok(v) => v,
                    Err(e) => match map_collaborator_error(e.as_ref()) {
                        MonitorError::TraceExhausted => {
                            tracing::info!("reading source exhausted");
                            break;
                        }
                        err => {
                            if failing {
                                tracing::debug!(error = %err, "reading source still failing");
                            } else {
                                tracing::warn!(error = %err, "reading source failed; skipping sample");
                                failing = true;
                            }
                            continue;
                        }
                    },
                };
                if failing {
                    tracing::info!("reading source recovered");
                    failing = false;
                }
                last_ok_clone.store(clock.ms_since(epoch), Ordering::Relaxed);

                xch::select! {
                    send(tx, celsius) -> res => {
                        // consumer gone; nothing left to do
                        if res.is_err() {
                            tracing::debug!("sampler consumer disconnected, exiting thread");
                            break;
                        }
                    }
                    recv(shutdown_rx) -> _ => break,
                }
            }
            tracing::trace!("sampler thread exiting cleanly");
        });

        Self {
            rx,
            last_ok,
            epoch,
            shutdown: Some(shutdown_tx),
            join_handle: Some(join_handle),
        }
    }

    /// Receiver for use in `select!`; a disconnect means the source ended.
    pub fn receiver(&self) -> &xch::Receiver<f64> {
        &self.rx
    }

    /// Instant the sampler was spawned; stall timestamps are relative to it.
    pub fn epoch(&self) -> Instant {
        self.epoch
    }

    /// Drain the channel and keep only the newest reading.
    pub fn latest(&self) -> Option<f64> {
        self.rx.try_iter().last()
    }

    /// Milliseconds between the last good reading and `now_ms` (both since
    /// this sampler's epoch).
    pub fn stalled_for(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_ok.load(Ordering::Relaxed))
    }

    /// Convenience helper: compute stall using this sampler's epoch and a real monotonic clock.
    pub fn stalled_for_now(&self) -> u64 {
        let now_ms = {
            let dur = Instant::now().saturating_duration_since(self.epoch);
            (dur.as_millis().min(u128::from(u64::MAX))) as u64
        };
        self.stalled_for(now_ms)
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        drop(self.shutdown.take());
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("sampler thread joined"),
                Err(e) => tracing::warn!(?e, "sampler thread panicked during shutdown"),
            }
        }
    }
}

/// Builds a fresh reading source for each sampling session.
pub type SourceFactory =
    Box<dyn FnMut() -> Result<Box<dyn ReadingSource + Send>, BoxError> + Send>;

/// The single sampling session owned by the decision loop.
///
/// `start` while active is a no-op; `stop` drops the running `Sampler`
/// together with its receiver, so no buffered sample survives the session.
pub struct SamplingSession {
    factory: SourceFactory,
    period: Duration,
    clock: SharedClock,
    active: Option<Sampler>,
}

/// Clock shared between the decision loop and every sampler thread.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

impl SamplingSession {
    pub fn new(factory: SourceFactory, period: Duration, clock: SharedClock) -> Self {
        Self {
            factory,
            period,
            clock,
            active: None,
        }
    }

    /// Returns whether a session is running afterwards.
    pub fn start(&mut self) -> bool {
        if self.active.is_some() {
            tracing::debug!("sampling session already running");
            return true;
        }
        match (self.factory)() {
            Ok(source) => {
                tracing::info!(period_ms = self.period.as_millis() as u64, "sampling started");
                self.active = Some(Sampler::spawn(source, self.period, self.clock.clone()));
                true
            }
            Err(e) => {
                let err = map_collaborator_error(e.as_ref());
                tracing::warn!(error = %err, "reading source unavailable; not sampling");
                false
            }
        }
    }

    pub fn stop(&mut self) {
        if self.active.take().is_some() {
            tracing::info!("sampling stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn sampler(&self) -> Option<&Sampler> {
        self.active.as_ref()
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
