//! Per-tick snapshot of the dwelling.

use std::fmt;

use crate::devices::battery::PowerBand;
use crate::devices::buzzer::AlarmSignal;
use crate::devices::pin::LightColor;

use super::access::AccessState;
use super::clock::TICK_MS;
use super::security::SecurityPhase;

/// Complete record of one scheduler tick, taken after every subsystem ran.
#[derive(Debug, Clone, PartialEq)]
pub struct TickRecord {
    /// Tick count.
    pub tick: u32,
    /// Nominal elapsed time in seconds.
    pub seconds: f64,
    /// Battery level after this tick (0 to 100).
    pub battery_level: f64,
    pub charging: bool,
    pub band: PowerBand,
    /// Solar light reading for this tick (0 to 100).
    pub solar_pct: f64,
    pub interior_on: bool,
    /// Interior dimmer level (0 to 255).
    pub interior_brightness: u8,
    pub exterior_on: bool,
    /// Exterior light was switched on by hand.
    pub exterior_override: bool,
    /// Intrusion sensor reads on.
    pub intruder: bool,
    /// Exterior alert indicator lit.
    pub alert_on: bool,
    pub security: SecurityPhase,
    /// Alarm signal active after this tick.
    pub alarm: AlarmSignal,
    /// A tone started during this tick.
    pub tone_emitted: bool,
    pub access: AccessState,
    pub unlocked: bool,
    pub battery_light: Option<LightColor>,
    /// Display contents, when the host can read them back.
    pub lcd: [String; 2],
}

impl TickRecord {
    /// Nominal seconds elapsed at `tick`.
    pub fn seconds_at(tick: u32) -> f64 {
        f64::from(tick) * TICK_MS as f64 / 1000.0
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

impl fmt::Display for TickRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>5} ({:>6.1}s) | bat={:>5.1}% {:<9}{} sol={:>5.1}% | \
             int={}@{:<3} ext={}{} | sec={:<9} alarm={:<8} | access={}",
            self.tick,
            self.seconds,
            self.battery_level,
            self.band,
            if self.charging { "+" } else { " " },
            self.solar_pct,
            on_off(self.interior_on),
            self.interior_brightness,
            on_off(self.exterior_on),
            if self.exterior_override {
                "(manual)"
            } else {
                ""
            },
            self.security,
            self.alarm,
            self.access,
        )
    }
}
