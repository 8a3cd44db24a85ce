use std::time::Duration;

use thermo_core::mocks::{ScriptedPower, UnavailablePower};
use thermo_core::power::PowerWatch;
use thermo_traits::PowerStatus;

fn status(charging: bool, battery: Option<u8>) -> PowerStatus {
    PowerStatus {
        charging,
        battery_percent: battery,
    }
}

#[test]
fn only_changes_are_delivered() {
    let script = ScriptedPower::new([
        status(false, Some(50)),
        status(false, Some(50)),
        status(true, Some(50)),
        status(true, Some(50)),
        status(true, Some(51)),
        status(false, Some(51)),
    ]);
    let watch = PowerWatch::spawn(script, Duration::from_millis(2));
    let rx = watch.receiver();
    let mut got = Vec::new();
    while let Ok(s) = rx.recv_timeout(Duration::from_millis(300)) {
        got.push(s);
    }
    assert_eq!(
        got,
        vec![
            status(false, Some(50)),
            status(true, Some(50)),
            status(true, Some(51)),
            status(false, Some(51)),
        ]
    );
}

#[test]
fn unavailable_monitor_sends_nothing() {
    let watch = PowerWatch::spawn(UnavailablePower, Duration::from_millis(2));
    assert!(
        watch
            .receiver()
            .recv_timeout(Duration::from_millis(100))
            .is_err()
    );
}

#[test]
fn drop_joins_promptly() {
    let watch = PowerWatch::spawn(ScriptedPower::charging(), Duration::from_secs(30));
    let first = watch
        .receiver()
        .recv_timeout(Duration::from_secs(2))
        .expect("initial status");
    assert!(first.charging);
    let t0 = std::time::Instant::now();
    drop(watch);
    assert!(t0.elapsed() < Duration::from_secs(2));
}
