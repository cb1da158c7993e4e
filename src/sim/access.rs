//! Keypad PIN entry for the access lock.
//!
//! Entry is a state machine advanced by one key per poll, so the rest of the
//! dwelling keeps ticking while someone types. Feedback pauses are tick
//! deadlines rather than sleeps.

use std::fmt;

use tracing::{debug, info, warn};

use crate::devices::pin::{LightColor, TwoColorLight};
use crate::devices::types::{CharacterDisplay, DigitalOutput, KeypadSource, Light};

/// The access code.
pub const PIN: [char; 6] = ['7', '4', '5', '2', 'A', '0'];
/// Consecutive failures that trigger a lockout.
pub const FAILURE_LIMIT: u32 = 3;
/// Ticks the unlock message stays up.
pub const UNLOCKED_DELAY_TICKS: u32 = 20;
/// Ticks the bad-code message stays up.
pub const BAD_CODE_DELAY_TICKS: u32 = 50;
/// Ticks of a lockout.
pub const LOCKOUT_DELAY_TICKS: u32 = 150;
/// First display column of the `*` echo.
pub const ECHO_COLUMN: u8 = 10;

/// Keys on the 4x4 matrix, row by row.
pub const KEYMAP: [[char; 4]; 4] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

/// Whether `key` exists on the keypad.
pub fn is_keypad_key(key: char) -> bool {
    KEYMAP.iter().flatten().any(|&k| k == key)
}

/// Where the panel is in the entry cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    /// Collecting keys; `entered` have been typed so far.
    Entering { entered: usize },
    /// Correct code; showing the unlock message until `until`.
    Accepted { until: u32 },
    /// Wrong code; showing the failure count until `until`.
    Rejected { until: u32 },
    /// Too many failures; ignoring keys until `until`.
    LockedOut { until: u32 },
    Unlocked,
}

impl fmt::Display for AccessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entering { entered } => write!(f, "entering({entered})"),
            Self::Accepted { .. } => f.write_str("accepted"),
            Self::Rejected { .. } => f.write_str("rejected"),
            Self::LockedOut { .. } => f.write_str("locked_out"),
            Self::Unlocked => f.write_str("unlocked"),
        }
    }
}

/// Keypad, lock light and the PIN entry state machine.
#[derive(Debug)]
pub struct AccessPanel<K, O> {
    keypad: K,
    light: TwoColorLight<O>,
    state: AccessState,
    input: [char; PIN.len()],
    failures: u32,
    lockouts: u32,
    prompt_pending: bool,
}

impl<K: KeypadSource, O: DigitalOutput> AccessPanel<K, O> {
    /// Creates a panel. A locked panel shows red and prompts on the first
    /// poll; an unlocked one shows green and ignores the keypad.
    pub fn new(keypad: K, mut light: TwoColorLight<O>, start_locked: bool) -> Self {
        light.turn_on_red();
        let state = if start_locked {
            AccessState::Entering { entered: 0 }
        } else {
            light.turn_on_green();
            AccessState::Unlocked
        };
        Self {
            keypad,
            light,
            state,
            input: [' '; PIN.len()],
            failures: 0,
            lockouts: 0,
            prompt_pending: start_locked,
        }
    }

    /// Advances the panel at tick `now`, consuming at most one key while
    /// entering and discarding keys while a message is up.
    pub fn poll(&mut self, now: u32, display: &mut impl CharacterDisplay) {
        match self.state {
            AccessState::Unlocked => {
                self.discard_keys();
                return;
            }
            AccessState::Accepted { until } => {
                self.discard_keys();
                if now >= until {
                    display.clear();
                    self.state = AccessState::Unlocked;
                }
                return;
            }
            AccessState::Rejected { until } | AccessState::LockedOut { until } => {
                if now < until {
                    self.discard_keys();
                    return;
                }
                display.clear();
                self.state = AccessState::Entering { entered: 0 };
                self.prompt_pending = true;
            }
            AccessState::Entering { .. } => {}
        }

        if self.prompt_pending {
            display.clear();
            display.print_at(0, 0, "Input PIN:     ");
            self.input = [' '; PIN.len()];
            self.prompt_pending = false;
        }

        let AccessState::Entering { entered } = self.state else {
            return;
        };
        let Some(key) = self.keypad.poll_key() else {
            return;
        };
        if !is_keypad_key(key) {
            debug!(?key, "ignoring key not on keypad");
            return;
        }

        self.input[entered] = key;
        display.print_at(ECHO_COLUMN + entered as u8, 0, "*");
        let entered = entered + 1;
        if entered < PIN.len() {
            self.state = AccessState::Entering { entered };
        } else {
            self.validate(now, display);
        }
    }

    fn validate(&mut self, now: u32, display: &mut impl CharacterDisplay) {
        display.clear();
        if self.input == PIN {
            info!(tick = now, "system unlocked");
            self.failures = 0;
            self.light.turn_off();
            self.light.turn_on_green();
            display.print_at(0, 0, "System Unlocked");
            self.state = AccessState::Accepted {
                until: now.saturating_add(UNLOCKED_DELAY_TICKS),
            };
            return;
        }

        self.failures += 1;
        if self.failures == FAILURE_LIMIT {
            warn!(tick = now, "access locked out");
            display.print_at(0, 0, "There Will Be A");
            display.print_at(0, 1, "15 Second Delay");
            self.failures = 0;
            self.lockouts += 1;
            self.state = AccessState::LockedOut {
                until: now.saturating_add(LOCKOUT_DELAY_TICKS),
            };
        } else {
            warn!(tick = now, failures = self.failures, "bad access code");
            display.print_at(0, 0, "Bad Code:");
            display.print_at(ECHO_COLUMN, 0, &self.failures.to_string());
            display.print_at(0, 1, "Try Again");
            self.state = AccessState::Rejected {
                until: now.saturating_add(BAD_CODE_DELAY_TICKS),
            };
        }
    }

    fn discard_keys(&mut self) {
        while self.keypad.poll_key().is_some() {}
    }

    pub fn state(&self) -> AccessState {
        self.state
    }

    /// True from the moment the correct code is accepted.
    pub fn is_unlocked(&self) -> bool {
        matches!(
            self.state,
            AccessState::Accepted { .. } | AccessState::Unlocked
        )
    }

    /// Whether the panel is using the display, so status refresh must wait.
    pub fn owns_display(&self) -> bool {
        self.state != AccessState::Unlocked
    }

    /// Consecutive wrong codes since the last lockout or unlock.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Lockouts entered since construction.
    pub fn lockouts(&self) -> u32 {
        self.lockouts
    }

    pub fn light_color(&self) -> Option<LightColor> {
        self.light.color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::sim::{SimKeypad, SimLine};
    use crate::sim::display::TextGrid;

    fn panel() -> (AccessPanel<SimKeypad, SimLine>, SimKeypad, TextGrid) {
        let keypad = SimKeypad::default();
        let light = TwoColorLight::new(SimLine::default(), SimLine::default());
        (
            AccessPanel::new(keypad.clone(), light, true),
            keypad,
            TextGrid::default(),
        )
    }

    fn poll_for(
        panel: &mut AccessPanel<SimKeypad, SimLine>,
        grid: &mut TextGrid,
        ticks: std::ops::Range<u32>,
    ) {
        for t in ticks {
            panel.poll(t, grid);
        }
    }

    #[test]
    fn prompts_and_echoes_one_key_per_poll() {
        let (mut panel, keypad, mut grid) = panel();
        keypad.press_all("745");
        panel.poll(0, &mut grid);
        assert_eq!(grid.row(0), "Input PIN:*     ");
        panel.poll(1, &mut grid);
        assert_eq!(panel.state(), AccessState::Entering { entered: 2 });
        assert_eq!(keypad.pending(), 1);
    }

    #[test]
    fn correct_code_unlocks() {
        let (mut panel, keypad, mut grid) = panel();
        keypad.press_all("7452A0");
        poll_for(&mut panel, &mut grid, 0..6);
        assert!(panel.is_unlocked());
        assert_eq!(panel.state(), AccessState::Accepted { until: 25 });
        assert_eq!(grid.row(0), "System Unlocked ");
        assert_eq!(panel.light_color(), Some(LightColor::Green));

        poll_for(&mut panel, &mut grid, 6..25);
        assert!(panel.owns_display());
        panel.poll(25, &mut grid);
        assert_eq!(panel.state(), AccessState::Unlocked);
        assert!(!panel.owns_display());
        assert_eq!(grid.row(0), " ".repeat(16));
    }

    #[test]
    fn wrong_code_shows_count_then_reprompts() {
        let (mut panel, keypad, mut grid) = panel();
        keypad.press_all("123456");
        poll_for(&mut panel, &mut grid, 0..6);
        assert_eq!(panel.failures(), 1);
        assert_eq!(grid.row(0), "Bad Code: 1     ");
        assert_eq!(grid.row(1), "Try Again       ");
        assert_eq!(panel.light_color(), Some(LightColor::Red));

        keypad.press('7');
        panel.poll(30, &mut grid);
        assert_eq!(keypad.pending(), 0);
        panel.poll(55, &mut grid);
        assert_eq!(panel.state(), AccessState::Entering { entered: 0 });
        assert_eq!(grid.row(0), "Input PIN:      ");
    }

    #[test]
    fn third_failure_locks_out_and_resets_count() {
        let (mut panel, keypad, mut grid) = panel();
        for attempt in 0..3u32 {
            let start = attempt * 100;
            keypad.press_all("123456");
            poll_for(&mut panel, &mut grid, start..start + 6);
        }
        assert_eq!(panel.failures(), 0);
        assert_eq!(panel.lockouts(), 1);
        assert_eq!(panel.state(), AccessState::LockedOut { until: 355 });
        assert_eq!(grid.row(0), "There Will Be A ");
        assert_eq!(grid.row(1), "15 Second Delay ");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let (mut panel, keypad, mut grid) = panel();
        keypad.press_all("x7");
        panel.poll(0, &mut grid);
        assert_eq!(panel.state(), AccessState::Entering { entered: 0 });
        panel.poll(1, &mut grid);
        assert_eq!(panel.state(), AccessState::Entering { entered: 1 });
    }

    #[test]
    fn starting_unlocked_skips_entry() {
        let keypad = SimKeypad::default();
        let light = TwoColorLight::new(SimLine::default(), SimLine::default());
        let mut panel = AccessPanel::new(keypad.clone(), light, false);
        let mut grid = TextGrid::default();
        keypad.press('1');
        panel.poll(0, &mut grid);
        assert!(panel.is_unlocked());
        assert_eq!(panel.light_color(), Some(LightColor::Green));
        assert_eq!(grid.row(0), " ".repeat(16));
    }

    #[test]
    fn deadlines_saturate_at_end_of_tick_range() {
        let (mut panel, keypad, mut grid) = panel();
        keypad.press_all("123456");
        let start = u32::MAX - 5;
        poll_for(&mut panel, &mut grid, start..u32::MAX);
        panel.poll(u32::MAX, &mut grid);
        assert_eq!(panel.state(), AccessState::Rejected { until: u32::MAX });
    }
}
