//! Host-side simulation engine that drives a dwelling on a simulated board.

use tracing::debug;

use crate::config::ScenarioConfig;
use crate::devices::sim::{
    SimAnalog, SimBoard, SimBuzzer, SimDisplay, SimDuty, SimKeypad, SimLine,
};
use crate::devices::solar::SolarProfile;

use super::event::{InputLine, InputWindow, KeypadEntry};
use super::scheduler::{Dwelling, DwellingPins, DwellingSettings};
use super::types::TickRecord;

/// The harness side of every simulated pin.
///
/// Each field shares state with the matching pin owned by the dwelling, so
/// setting an input here is what the dwelling reads on its next tick.
#[derive(Debug, Clone)]
pub struct SimHandles {
    pub interior_button: SimLine,
    pub exterior_button: SimLine,
    pub intruder: SimLine,
    pub interior_light: SimDuty,
    pub exterior_light: SimLine,
    pub alert_light: SimLine,
    pub battery_red: SimLine,
    pub battery_green: SimLine,
    pub lock_red: SimLine,
    pub lock_green: SimLine,
    pub solar: SimAnalog,
    pub buzzer: SimBuzzer,
    pub display: SimDisplay,
    pub keypad: SimKeypad,
}

impl SimHandles {
    /// Drives `line` to its logical on/off level.
    ///
    /// Buttons are pull-ups that read low when pressed; the motion sensor
    /// reads high when triggered.
    pub fn set_input(&self, line: InputLine, on: bool) {
        match line {
            InputLine::InteriorButton => self.interior_button.set(!on),
            InputLine::ExteriorButton => self.exterior_button.set(!on),
            InputLine::Intruder => self.intruder.set(on),
        }
    }

    /// The two display rows.
    pub fn lcd_rows(&self) -> [String; 2] {
        let grid = self.display.grid();
        [grid.row(0), grid.row(1)]
    }
}

/// Builds a dwelling on a fresh simulated board with every input idle.
pub fn wire_sim(settings: DwellingSettings) -> (Dwelling<SimBoard>, SimHandles) {
    let handles = SimHandles {
        interior_button: SimLine::new(true),
        exterior_button: SimLine::new(true),
        intruder: SimLine::new(false),
        interior_light: SimDuty::default(),
        exterior_light: SimLine::default(),
        alert_light: SimLine::default(),
        battery_red: SimLine::default(),
        battery_green: SimLine::default(),
        lock_red: SimLine::default(),
        lock_green: SimLine::default(),
        solar: SimAnalog::default(),
        buzzer: SimBuzzer::default(),
        display: SimDisplay::default(),
        keypad: SimKeypad::default(),
    };
    let pins = DwellingPins::<SimBoard> {
        interior_button: handles.interior_button.clone(),
        exterior_button: handles.exterior_button.clone(),
        intruder: handles.intruder.clone(),
        interior_light: handles.interior_light.clone(),
        exterior_light: handles.exterior_light.clone(),
        alert_light: handles.alert_light.clone(),
        battery_red: handles.battery_red.clone(),
        battery_green: handles.battery_green.clone(),
        lock_red: handles.lock_red.clone(),
        lock_green: handles.lock_green.clone(),
        solar: handles.solar.clone(),
        buzzer: handles.buzzer.clone(),
        display: handles.display.clone(),
        keypad: handles.keypad.clone(),
    };
    (Dwelling::new(pins, settings), handles)
}

/// Simulation engine owning the dwelling, its board and the input scripts.
pub struct Engine {
    dwelling: Dwelling<SimBoard>,
    handles: SimHandles,
    solar: SolarProfile,
    inputs: Vec<InputWindow>,
    keypad_script: Vec<KeypadEntry>,
    held: Vec<InputLine>,
    total_ticks: u32,
}

impl Engine {
    /// Creates a new simulation engine.
    ///
    /// # Arguments
    ///
    /// * `settings` - Dwelling start-up parameters
    /// * `solar` - Source of raw photoresistor samples
    /// * `inputs` - Windows during which buttons or the sensor read on
    /// * `keypad_script` - Keys queued at given ticks
    /// * `total_ticks` - Ticks executed by [`run`](Self::run)
    pub fn new(
        settings: DwellingSettings,
        solar: SolarProfile,
        inputs: Vec<InputWindow>,
        keypad_script: Vec<KeypadEntry>,
        total_ticks: u32,
    ) -> Self {
        let (dwelling, handles) = wire_sim(settings);
        Self {
            dwelling,
            handles,
            solar,
            inputs,
            keypad_script,
            held: Vec::new(),
            total_ticks,
        }
    }

    /// Builds an engine from a scenario. The scenario should be validated
    /// first; the solar profile panics on an inconsistent day.
    pub fn from_config(cfg: &ScenarioConfig) -> Self {
        let sol = &cfg.solar;
        let solar = SolarProfile::new(
            sol.period_ticks,
            sol.sunrise_tick,
            sol.sunset_tick,
            sol.raw_night,
            sol.raw_peak,
            sol.noise_std,
            cfg.simulation.seed,
        );
        Self::new(
            cfg.dwelling_settings(),
            solar,
            cfg.inputs.clone(),
            cfg.keypad.clone(),
            cfg.simulation.ticks,
        )
    }

    /// Applies the scripted inputs for tick `t`, runs the tick and returns
    /// its record with the display contents filled in.
    pub fn step(&mut self, t: u32) -> TickRecord {
        self.apply_inputs(t);
        self.handles.solar.set(self.solar.raw_at(t));
        for entry in self.keypad_script.iter().filter(|e| e.tick == t) {
            debug!(tick = t, keys = %entry.keys, "keypad input");
            self.handles.keypad.press_all(&entry.keys);
        }

        let mut record = self.dwelling.tick(t);
        record.lcd = self.handles.lcd_rows();
        record
    }

    fn apply_inputs(&self, t: u32) {
        for line in [
            InputLine::InteriorButton,
            InputLine::ExteriorButton,
            InputLine::Intruder,
        ] {
            let scripted = self
                .inputs
                .iter()
                .any(|w| w.line == line && w.is_active(t));
            self.handles.set_input(line, scripted || self.is_held(line));
        }
    }

    /// Holds `line` on (or releases it) on top of the script, until changed.
    pub fn set_held(&mut self, line: InputLine, on: bool) {
        self.held.retain(|&l| l != line);
        if on {
            self.held.push(line);
        }
    }

    pub fn is_held(&self, line: InputLine) -> bool {
        self.held.contains(&line)
    }

    /// Queues keys on the keypad for the next step.
    pub fn press_keys(&self, keys: &str) {
        self.handles.keypad.press_all(keys);
    }

    /// Executes every tick and returns the complete record vector.
    pub fn run(&mut self) -> Vec<TickRecord> {
        (0..self.total_ticks).map(|t| self.step(t)).collect()
    }

    pub fn dwelling(&self) -> &Dwelling<SimBoard> {
        &self.dwelling
    }

    /// Harness handles, for driving inputs by hand between steps.
    pub fn handles(&self) -> &SimHandles {
        &self.handles
    }

    pub fn total_ticks(&self) -> u32 {
        self.total_ticks
    }
}
