//! Intrusion handling through the engine.

mod common;

use dwelling_sim::sim::event::{InputLine, InputWindow};
use dwelling_sim::sim::kpi::RunReport;
use dwelling_sim::sim::security::SecurityPhase;

#[test]
fn night_intrusion_lights_then_blinks_then_clears() {
    let records = common::run_preset("night_intrusion");

    let trigger = &records[100];
    assert_eq!(trigger.security, SecurityPhase::Triggered);
    assert!(trigger.exterior_on);
    assert!(!trigger.exterior_override);
    assert!(trigger.alert_on);
    // The status line is drawn before security runs, so it lags a tick.
    assert_eq!(records[101].lcd[0].chars().nth(8), Some('e'));
    assert_eq!(records[101].lcd[0].chars().nth(9), Some('A'));

    assert_eq!(records[120].security, SecurityPhase::Triggered);
    assert_eq!(records[121].security, SecurityPhase::Blinking);
    assert!(!records[121].alert_on);
    assert!(!records[122].alert_on);
    assert!(records[123].alert_on);
    assert!(records[140].exterior_on);

    let cleared = &records[160];
    assert_eq!(cleared.security, SecurityPhase::Idle);
    assert!(!cleared.exterior_on);
    assert!(!cleared.alert_on);

    let report = RunReport::from_records(&records);
    assert_eq!(report.intrusion_ticks, 70);
}

#[test]
fn floodlight_draws_from_battery() {
    let records = common::run_preset("night_intrusion");
    assert_eq!(records[100].battery_level, 60.0);
    assert_eq!(records[160].battery_level, 42.0);
    assert_eq!(records[399].battery_level, 42.0);
}

#[test]
fn intrusion_clears_manual_override() {
    let inputs = vec![
        InputWindow::new(InputLine::ExteriorButton, 0, 3),
        InputWindow::new(InputLine::Intruder, 10, 20),
    ];
    let mut engine = common::engine_with(common::settings(50.0), inputs, Vec::new(), 30);
    let records = engine.run();

    assert!(records[5].exterior_on);
    assert!(records[5].exterior_override);
    assert!(!records[10].exterior_override);
    assert!(records[19].exterior_on);
    assert!(!records[20].exterior_on);
}

#[test]
fn manual_light_survives_without_intrusion() {
    let inputs = vec![InputWindow::new(InputLine::ExteriorButton, 0, 3)];
    let mut engine = common::engine_with(common::settings(50.0), inputs, Vec::new(), 30);
    let records = engine.run();
    assert!(records.iter().all(|r| r.exterior_on));
}

#[test]
fn critical_intrusion_raises_alert_without_floodlight() {
    let inputs = vec![InputWindow::new(InputLine::Intruder, 0, 30)];
    let mut engine = common::engine_with(common::settings(5.0), inputs, Vec::new(), 10);
    let records = engine.run();
    assert_eq!(records[0].security, SecurityPhase::Triggered);
    assert!(records[0].alert_on);
    assert!(records.iter().all(|r| !r.exterior_on));
}
