//! Sampling threads are joined on drop, deliver on cadence, and a session
//! never runs more than one sampler.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use thermo_core::mocks::NoopSource;
use thermo_core::sampler::{Sampler, SamplingSession, SharedClock};
use thermo_hardware::ReplayReadingSource;
use thermo_traits::clock::{Clock, ManualClock, MonotonicClock};
use thermo_traits::{BoxError, ReadingSource};

fn shared_clock() -> SharedClock {
    Arc::new(MonotonicClock::new())
}

#[test]
fn drop_is_prompt_even_with_long_period() {
    let sampler = Sampler::spawn(NoopSource, Duration::from_secs(30), MonotonicClock::new());
    std::thread::sleep(Duration::from_millis(20));
    let t0 = Instant::now();
    drop(sampler);
    assert!(t0.elapsed() < Duration::from_secs(2));
}

#[test]
fn delivers_readings_then_disconnects_when_exhausted() {
    let sampler = Sampler::spawn(
        ReplayReadingSource::new([25.0, 28.0, 31.0]),
        Duration::from_millis(5),
        MonotonicClock::new(),
    );
    let rx = sampler.receiver().clone();
    let mut got = Vec::new();
    while let Ok(v) = rx.recv_timeout(Duration::from_secs(2)) {
        got.push(v);
    }
    assert_eq!(got, vec![25.0, 28.0, 31.0]);
}

#[test]
fn first_reading_waits_one_period() {
    let sampler = Sampler::spawn(
        ReplayReadingSource::new([25.0]),
        Duration::from_millis(200),
        MonotonicClock::new(),
    );
    assert!(sampler.latest().is_none());
    let v = sampler
        .receiver()
        .recv_timeout(Duration::from_secs(2))
        .expect("one reading");
    assert_eq!(v, 25.0);
}

#[test]
fn failing_source_reports_stall() {
    let sampler = Sampler::spawn(NoopSource, Duration::from_millis(5), MonotonicClock::new());
    std::thread::sleep(Duration::from_millis(60));
    assert!(sampler.latest().is_none());
    assert!(sampler.stalled_for_now() >= 50);
}

#[test]
fn stall_is_measured_on_the_injected_clock() {
    let clock = ManualClock::new();
    let sampler = Sampler::spawn(NoopSource, Duration::from_millis(5), clock.clone());
    assert_eq!(sampler.stalled_for(clock.ms_since(sampler.epoch())), 0);
    clock.advance_ms(8_000);
    assert_eq!(sampler.stalled_for(clock.ms_since(sampler.epoch())), 8_000);
}

#[test]
fn good_readings_reset_the_stall_timer() {
    let clock = ManualClock::new();
    clock.advance_ms(1_000);
    let sampler = Sampler::spawn(
        ReplayReadingSource::new([25.0]),
        Duration::from_millis(200),
        clock.clone(),
    );
    // well before the first read
    clock.advance_ms(3_000);
    sampler
        .receiver()
        .recv_timeout(Duration::from_secs(2))
        .expect("one reading");
    // stamped at 3000 ms after the sampler epoch
    assert_eq!(sampler.stalled_for(clock.ms_since(sampler.epoch())), 0);
}

#[test]
fn session_starts_once_and_restarts_fresh() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = created.clone();
    let factory = Box::new(move || -> Result<Box<dyn ReadingSource + Send>, BoxError> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ReplayReadingSource::new([25.0])))
    });
    let mut session = SamplingSession::new(factory, Duration::from_millis(5), shared_clock());

    assert!(session.start());
    assert!(session.start());
    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert!(session.is_active());

    session.stop();
    assert!(!session.is_active());
    assert!(session.sampler().is_none());

    assert!(session.start());
    assert_eq!(created.load(Ordering::SeqCst), 2);
    let v = session
        .sampler()
        .expect("active")
        .receiver()
        .recv_timeout(Duration::from_secs(2))
        .expect("fresh source delivers from the start");
    assert_eq!(v, 25.0);
}

#[test]
fn session_stays_inactive_when_source_unavailable() {
    let factory = Box::new(|| -> Result<Box<dyn ReadingSource + Send>, BoxError> {
        Err("sensor missing".into())
    });
    let mut session = SamplingSession::new(factory, Duration::from_millis(5), shared_clock());
    assert!(!session.start());
    assert!(!session.is_active());
}

#[test]
fn many_sessions_do_not_leak() {
    let factory = Box::new(|| -> Result<Box<dyn ReadingSource + Send>, BoxError> {
        Ok(Box::new(NoopSource))
    });
    let mut session = SamplingSession::new(factory, Duration::from_millis(1), shared_clock());
    for _ in 0..20 {
        session.start();
        std::thread::sleep(Duration::from_millis(2));
        session.stop();
    }
    assert!(!session.is_active());
}
