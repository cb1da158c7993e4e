use std::fmt;

use serde::Deserialize;

/// Sensor lines a host run can drive from a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputLine {
    InteriorButton,
    ExteriorButton,
    Intruder,
}

impl fmt::Display for InputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InteriorButton => "interior_button",
            Self::ExteriorButton => "exterior_button",
            Self::Intruder => "intruder",
        })
    }
}

/// A scripted period during which an input reads "on".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputWindow {
    pub line: InputLine,
    /// First tick the line is on (inclusive).
    pub start_tick: u32,
    /// First tick the line is off again (exclusive).
    pub end_tick: u32,
}

impl InputWindow {
    /// Creates a window spanning `[start_tick, end_tick)`.
    ///
    /// # Panics
    ///
    /// Panics if `start_tick >= end_tick`.
    pub fn new(line: InputLine, start_tick: u32, end_tick: u32) -> Self {
        assert!(start_tick < end_tick);
        Self {
            line,
            start_tick,
            end_tick,
        }
    }

    /// A one-tick button press at `tick`.
    pub fn press(line: InputLine, tick: u32) -> Self {
        Self::new(line, tick, tick + 1)
    }

    /// Returns `true` when `tick` falls within the window.
    pub fn is_active(&self, tick: u32) -> bool {
        tick >= self.start_tick && tick < self.end_tick
    }
}

/// Keys queued on the keypad at a given tick.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeypadEntry {
    pub tick: u32,
    pub keys: String,
}

impl KeypadEntry {
    pub fn new(tick: u32, keys: impl Into<String>) -> Self {
        Self {
            tick,
            keys: keys.into(),
        }
    }
}
