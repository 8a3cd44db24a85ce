use rstest::rstest;
use thermo_core::{
    AlarmMachine, ChargingState, Effect, Event, GestureSample, Limit, Phase, TempUnit, Temperature,
};
use thermo_ui::{
    ALARM_TITLE, CONNECT_CHARGER, SWIPE_HINT, UNPLUG_HINT, alarm_lines, effect_line, main_lines,
    render,
};

fn machine_with(events: Vec<Event>) -> AlarmMachine {
    let mut m = AlarmMachine::default();
    for ev in events {
        m.handle(ev);
    }
    m
}

#[test]
fn idle_screen_asks_for_charger() {
    let m = AlarmMachine::default();
    let lines = main_lines(&m.snapshot());
    assert_eq!(lines[0], "Temperature Alarm");
    assert_eq!(lines[1], CONNECT_CHARGER);
    assert!(lines.contains(&"Set Limit (Celsius): 30".to_string()));
    assert!(lines.contains(&"Switch to Fahrenheit".to_string()));
    assert!(alarm_lines(&m.snapshot()).is_none());
}

#[test]
fn monitoring_screen_shows_battery_and_reading() {
    let m = machine_with(vec![
        Event::Battery(80),
        Event::Charging(ChargingState::Charging),
        Event::Sample(Temperature::celsius(27.46)),
    ]);
    let text = render(&m.snapshot());
    assert!(text.contains("Battery Level: 80%"));
    assert!(text.contains("Temperature: 27.5°C"));
    assert!(!text.contains(CONNECT_CHARGER));
}

#[test]
fn alarm_screen_replaces_main_screen() {
    let m = machine_with(vec![
        Event::Charging(ChargingState::Charging),
        Event::Sample(Temperature::celsius(31.0)),
    ]);
    let snap = m.snapshot();
    assert_eq!(snap.phase, Phase::Alarming);
    let lines = alarm_lines(&snap).expect("alarm visible");
    assert_eq!(
        lines,
        vec![
            ALARM_TITLE.to_string(),
            "Current Temperature: 31.0°C".to_string(),
            SWIPE_HINT.to_string(),
            UNPLUG_HINT.to_string(),
        ]
    );
    assert!(render(&snap).starts_with(ALARM_TITLE));
}

#[test]
fn swipe_offset_is_echoed() {
    let m = machine_with(vec![
        Event::Charging(ChargingState::Charging),
        Event::Sample(Temperature::celsius(31.0)),
        Event::Gesture(GestureSample::ongoing(42.0)),
    ]);
    let lines = alarm_lines(&m.snapshot()).expect("alarm visible");
    assert_eq!(lines[2], "Swipe Right to Dismiss (42)");
}

#[test]
fn invalid_limit_is_flagged() {
    let m = machine_with(vec![Event::SetLimit("abc".into())]);
    let text = render(&m.snapshot());
    assert!(text.contains("Set Limit (Celsius): abc"));
    assert!(text.contains("alarm disabled"));
}

#[rstest]
#[case(Effect::StartSampling, None)]
#[case(Effect::GestureCancelled, None)]
#[case(
    Effect::PhaseChanged { from: Phase::Idle, to: Phase::Monitoring },
    Some("phase: idle -> monitoring")
)]
#[case(
    Effect::AlarmRaised { reading: Temperature::celsius(31.0) },
    Some("ALARM: Battery Temperature Limit Reached! (31.0°C)")
)]
#[case(
    Effect::AlarmDismissed { memory: Temperature::celsius(33.0) },
    Some("alarm dismissed at 33.0°C")
)]
#[case(Effect::UnitChanged(TempUnit::Fahrenheit), Some("unit: Fahrenheit"))]
#[case(
    Effect::LimitChanged(Limit::new("86", TempUnit::Fahrenheit)),
    Some("limit: 86 °F")
)]
#[case(Effect::BatteryChanged(55), Some("Battery Level: 55%"))]
fn effect_lines(#[case] effect: Effect, #[case] expected: Option<&str>) {
    assert_eq!(effect_line(&effect).as_deref(), expected);
}
