//! Simulation runner and TUI application state.

use std::collections::VecDeque;
use std::time::Instant;

use crate::config::ScenarioConfig;
use crate::sim::engine::Engine;
use crate::sim::event::InputLine;
use crate::sim::types::TickRecord;

/// Maximum number of history entries kept for the rolling chart.
const MAX_HISTORY: usize = 600;

/// Tick interval options in milliseconds (slowest → fastest).
const SPEED_LEVELS_MS: [u64; 6] = [500, 250, 100, 50, 20, 5];

/// Default speed index (100 ms, the nominal tick).
const DEFAULT_SPEED_IDX: usize = 2;

/// TUI application state.
pub struct App {
    engine: Engine,
    /// Buttons pressed from the keyboard, released after the next tick.
    pending_presses: Vec<InputLine>,
    /// Rolling history of tick records for the chart.
    pub history: VecDeque<TickRecord>,
    /// Next tick to execute.
    pub tick: u32,
    /// Total ticks in the run.
    pub total_ticks: u32,
    pub paused: bool,
    /// Current index into `SPEED_LEVELS_MS`.
    pub speed_idx: usize,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// When the last simulation tick was executed.
    pub last_tick: Instant,
    /// Name of the active scenario.
    pub preset_name: String,
}

impl App {
    /// Creates a new app for a validated scenario.
    pub fn new(scenario: &ScenarioConfig, name: &str) -> Self {
        let engine = Engine::from_config(scenario);
        let total_ticks = engine.total_ticks();
        Self {
            engine,
            pending_presses: Vec::new(),
            history: VecDeque::with_capacity(MAX_HISTORY),
            tick: 0,
            total_ticks,
            paused: false,
            speed_idx: DEFAULT_SPEED_IDX,
            quit: false,
            last_tick: Instant::now(),
            preset_name: name.to_string(),
        }
    }

    /// Advances the simulation by one tick if not finished.
    pub fn step(&mut self) {
        if self.is_finished() {
            return;
        }
        for &line in &self.pending_presses {
            self.engine.set_held(line, true);
        }
        let record = self.engine.step(self.tick);
        for line in self.pending_presses.drain(..) {
            self.engine.set_held(line, false);
        }

        if self.history.len() >= MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(record);
        self.tick += 1;
    }

    /// Presses a button for one tick.
    pub fn press(&mut self, line: InputLine) {
        if !self.pending_presses.contains(&line) {
            self.pending_presses.push(line);
        }
    }

    /// Flips the motion sensor.
    pub fn toggle_intruder(&mut self) {
        let on = self.engine.is_held(InputLine::Intruder);
        self.engine.set_held(InputLine::Intruder, !on);
    }

    pub fn intruder_held(&self) -> bool {
        self.engine.is_held(InputLine::Intruder)
    }

    /// Queues a key on the simulated keypad.
    pub fn press_key(&mut self, key: char) {
        let mut buf = [0; 4];
        self.engine.press_keys(key.encode_utf8(&mut buf));
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Increases simulation speed (shorter tick interval).
    pub fn speed_up(&mut self) {
        if self.speed_idx + 1 < SPEED_LEVELS_MS.len() {
            self.speed_idx += 1;
        }
    }

    /// Decreases simulation speed (longer tick interval).
    pub fn speed_down(&mut self) {
        if self.speed_idx > 0 {
            self.speed_idx -= 1;
        }
    }

    /// Returns the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        SPEED_LEVELS_MS[self.speed_idx]
    }

    /// Switches to a different preset, resetting simulation state.
    pub fn switch_preset(&mut self, name: &str) {
        let Ok(scenario) = ScenarioConfig::from_preset(name) else {
            return;
        };
        *self = Self {
            speed_idx: self.speed_idx,
            ..Self::new(&scenario, name)
        };
    }

    /// Restarts the current preset from the beginning.
    pub fn restart(&mut self) {
        let name = self.preset_name.clone();
        self.switch_preset(&name);
    }

    /// Returns `true` when all ticks have been executed.
    pub fn is_finished(&self) -> bool {
        self.tick >= self.total_ticks
    }

    /// Returns the most recent record, if any.
    pub fn last_record(&self) -> Option<&TickRecord> {
        self.history.back()
    }

    /// Battery level from the latest record, or the configured start.
    pub fn battery_level(&self) -> f64 {
        self.last_record()
            .map_or_else(|| self.engine.dwelling().battery().level(), |r| r.battery_level)
    }
}
