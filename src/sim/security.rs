//! Intrusion response: floodlight, alert indicator and blink phase.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use super::lighting::Floodlight;
use crate::devices::battery::PowerBand;
use crate::devices::pin::LatchedOutput;
use crate::devices::types::{DigitalOutput, Light};

/// Ticks after the trigger before the alert indicator starts blinking.
pub const BLINK_AFTER_TICKS: u32 = 20;
/// The alert indicator toggles once every this many ticks while blinking.
pub const BLINK_PERIOD_TICKS: u32 = 2;

/// Externally visible phase of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityPhase {
    Idle,
    Triggered,
    Blinking,
}

impl fmt::Display for SecurityPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Idle => "idle",
            Self::Triggered => "triggered",
            Self::Blinking => "blinking",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Triggered { light_on_at: u32 },
    Blinking { light_on_at: u32, blink_start: u32 },
}

/// Intrusion state machine.
///
/// ```text
/// Idle --sensor on--> Triggered --on for > 20 ticks--> Blinking
///   ^                     |                               |
///   +-----sensor off------+-------------------------------+
/// ```
///
/// While triggered the floodlight (unless the battery is critical) and the
/// alert indicator are held on. While blinking the indicator toggles every
/// second tick. Whenever the sensor reads off the indicator goes dark and
/// the floodlight is released.
#[derive(Debug)]
pub struct SecurityMonitor<O> {
    alert: LatchedOutput<O>,
    state: State,
}

impl<O: DigitalOutput> SecurityMonitor<O> {
    pub fn new(alert: LatchedOutput<O>) -> Self {
        Self {
            alert,
            state: State::Idle,
        }
    }

    /// Evaluates the sensor level at tick `now`.
    pub fn evaluate(
        &mut self,
        intruder_on: bool,
        band: PowerBand,
        now: u32,
        floodlight: &mut impl Floodlight,
    ) {
        if !intruder_on {
            if self.state != State::Idle {
                info!(tick = now, "intrusion cleared");
            }
            self.state = State::Idle;
            self.alert.turn_off();
            floodlight.release();
            return;
        }

        self.state = match self.state {
            State::Idle => {
                info!(tick = now, "intrusion detected");
                floodlight.clear_override();
                State::Triggered { light_on_at: now }
            }
            State::Triggered { light_on_at }
                if now.wrapping_sub(light_on_at) > BLINK_AFTER_TICKS =>
            {
                debug!(tick = now, "alert indicator blinking");
                State::Blinking {
                    light_on_at,
                    blink_start: now,
                }
            }
            held => held,
        };

        match self.state {
            State::Triggered { .. } => {
                if band != PowerBand::Critical {
                    floodlight.force_on();
                }
                self.alert.turn_on();
            }
            State::Blinking { blink_start, .. } => {
                if now.wrapping_sub(blink_start) % BLINK_PERIOD_TICKS == 0 {
                    self.alert.toggle();
                }
            }
            State::Idle => {}
        }
    }

    pub fn phase(&self) -> SecurityPhase {
        match self.state {
            State::Idle => SecurityPhase::Idle,
            State::Triggered { .. } => SecurityPhase::Triggered,
            State::Blinking { .. } => SecurityPhase::Blinking,
        }
    }

    /// Tick the current intrusion was first seen, if one is in progress.
    pub fn light_on_at(&self) -> Option<u32> {
        match self.state {
            State::Idle => None,
            State::Triggered { light_on_at } | State::Blinking { light_on_at, .. } => {
                Some(light_on_at)
            }
        }
    }

    /// Tick blinking started, if blinking.
    pub fn blink_start(&self) -> Option<u32> {
        match self.state {
            State::Blinking { blink_start, .. } => Some(blink_start),
            _ => None,
        }
    }

    pub fn alert_on(&self) -> bool {
        self.alert.is_on()
    }
}
