//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::devices::battery::MAX_LEVEL;
use crate::sim::clock::TICK_MS;
use crate::sim::event::{InputLine, InputWindow, KeypadEntry};
use crate::sim::lighting::PowerUsage;
use crate::sim::scheduler::DwellingSettings;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
///
/// ```toml
/// [simulation]
/// ticks = 600
///
/// [[inputs]]
/// line = "intruder"
/// start_tick = 100
/// end_tick = 160
///
/// [[keypad]]
/// tick = 10
/// keys = "7452A0"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run length and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// House battery parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Synthetic photoresistor signal.
    #[serde(default)]
    pub solar: SolarConfig,
    /// Battery drawn per charge cycle by each light.
    #[serde(default)]
    pub lighting: PowerUsage,
    /// Access panel parameters.
    #[serde(default)]
    pub access: AccessConfig,
    /// Scripted button presses and intrusions.
    #[serde(default)]
    pub inputs: Vec<InputWindow>,
    /// Scripted keypad entry.
    #[serde(default)]
    pub keypad: Vec<KeypadEntry>,
}

/// Run length and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of ticks to simulate (must be > 0).
    pub ticks: u32,
    /// Wall-clock length of a tick in real-time mode (ms, must be > 0).
    pub tick_ms: u64,
    /// Master random seed.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 4800,
            tick_ms: TICK_MS,
            seed: 42,
        }
    }
}

/// House battery parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Level at power-on (0 to 100).
    pub initial_level: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            initial_level: 50.0,
        }
    }
}

/// Synthetic photoresistor signal.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Ticks per simulated day (must be > 0).
    pub period_ticks: u32,
    /// Tick within the day when light starts (inclusive).
    pub sunrise_tick: u32,
    /// Tick within the day when light is gone (exclusive).
    pub sunset_tick: u32,
    /// Raw reading in darkness.
    pub raw_night: u16,
    /// Raw reading at noon.
    pub raw_peak: u16,
    /// Noise as a fraction of the daylight signal.
    pub noise_std: f32,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            period_ticks: 2400,
            sunrise_tick: 600,
            sunset_tick: 1800,
            raw_night: 150,
            raw_peak: 1000,
            noise_std: 0.05,
        }
    }
}

/// Access panel parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessConfig {
    /// Require the PIN at power-on.
    pub start_locked: bool,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.ticks"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: two simulated days with the lights
    /// switched on by hand and an unlocked panel.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            battery: BatteryConfig::default(),
            solar: SolarConfig::default(),
            lighting: PowerUsage::default(),
            access: AccessConfig::default(),
            inputs: vec![
                InputWindow::new(InputLine::InteriorButton, 100, 103),
                InputWindow::new(InputLine::InteriorButton, 200, 203),
                InputWindow::new(InputLine::ExteriorButton, 250, 253),
                InputWindow::new(InputLine::ExteriorButton, 300, 303),
                InputWindow::new(InputLine::InteriorButton, 1900, 1903),
                InputWindow::new(InputLine::InteriorButton, 2200, 2203),
            ],
            keypad: Vec::new(),
        }
    }

    /// Returns the night-intrusion preset: two intrusions before sunrise,
    /// one long enough to reach the blink phase.
    pub fn night_intrusion() -> Self {
        Self {
            simulation: SimulationConfig {
                ticks: 1200,
                ..SimulationConfig::default()
            },
            battery: BatteryConfig {
                initial_level: 60.0,
            },
            inputs: vec![
                InputWindow::new(InputLine::Intruder, 100, 160),
                InputWindow::new(InputLine::Intruder, 400, 410),
            ],
            ..Self::baseline()
        }
    }

    /// Returns the low-battery preset: a nearly flat battery with the
    /// interior light left on overnight.
    pub fn low_battery() -> Self {
        Self {
            simulation: SimulationConfig {
                ticks: 2400,
                ..SimulationConfig::default()
            },
            battery: BatteryConfig {
                initial_level: 12.0,
            },
            inputs: vec![InputWindow::new(InputLine::InteriorButton, 5, 8)],
            ..Self::baseline()
        }
    }

    /// Returns the lockout preset: three wrong codes, then the right one
    /// after the lockout expires.
    pub fn lockout() -> Self {
        Self {
            simulation: SimulationConfig {
                ticks: 600,
                ..SimulationConfig::default()
            },
            access: AccessConfig { start_locked: true },
            inputs: Vec::new(),
            keypad: vec![
                KeypadEntry::new(10, "123456"),
                KeypadEntry::new(80, "123456"),
                KeypadEntry::new(150, "123456"),
                KeypadEntry::new(320, "7452A0"),
            ],
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "night_intrusion", "low_battery", "lockout"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "night_intrusion" => Ok(Self::night_intrusion()),
            "low_battery" => Ok(Self::low_battery()),
            "lockout" => Ok(Self::lockout()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new(
                "scenario",
                format!("cannot read \"{}\": {e}", path.display()),
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Start-up parameters for the dwelling.
    pub fn dwelling_settings(&self) -> DwellingSettings {
        DwellingSettings {
            initial_battery: self.battery.initial_level,
            usage: self.lighting,
            start_locked: self.access.start_locked,
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.ticks == 0 {
            errors.push(ConfigError::new("simulation.ticks", "must be > 0"));
        }
        if s.tick_ms == 0 {
            errors.push(ConfigError::new("simulation.tick_ms", "must be > 0"));
        }

        if !(0.0..=MAX_LEVEL).contains(&self.battery.initial_level) {
            errors.push(ConfigError::new(
                "battery.initial_level",
                "must be in [0, 100]",
            ));
        }

        let sol = &self.solar;
        if sol.period_ticks == 0 {
            errors.push(ConfigError::new("solar.period_ticks", "must be > 0"));
        }
        if sol.sunrise_tick >= sol.sunset_tick {
            errors.push(ConfigError::new(
                "solar.sunrise_tick",
                "must be < solar.sunset_tick",
            ));
        }
        if sol.sunset_tick > sol.period_ticks {
            errors.push(ConfigError::new(
                "solar.sunset_tick",
                "must be <= solar.period_ticks",
            ));
        }
        if sol.raw_peak > 1023 {
            errors.push(ConfigError::new("solar.raw_peak", "must be <= 1023"));
        }
        if sol.raw_night > sol.raw_peak {
            errors.push(ConfigError::new(
                "solar.raw_night",
                "must be <= solar.raw_peak",
            ));
        }
        if sol.noise_std < 0.0 {
            errors.push(ConfigError::new("solar.noise_std", "must be >= 0"));
        }

        if self.lighting.interior < 0.0 {
            errors.push(ConfigError::new("lighting.interior", "must be >= 0"));
        }
        if self.lighting.exterior < 0.0 {
            errors.push(ConfigError::new("lighting.exterior", "must be >= 0"));
        }

        for (i, window) in self.inputs.iter().enumerate() {
            if window.start_tick >= window.end_tick {
                errors.push(ConfigError::new(
                    format!("inputs[{i}].start_tick"),
                    "must be < end_tick",
                ));
            }
        }
        for (i, entry) in self.keypad.iter().enumerate() {
            if entry.keys.is_empty() {
                errors.push(ConfigError::new(
                    format!("keypad[{i}].keys"),
                    "must not be empty",
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
        assert!(e.to_string().starts_with("config error: preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
ticks = 900
tick_ms = 50
seed = 99

[battery]
initial_level = 20.0

[solar]
period_ticks = 600
sunrise_tick = 100
sunset_tick = 500
raw_night = 200
raw_peak = 900
noise_std = 0.0

[lighting]
interior = 2.0
exterior = 4.0

[access]
start_locked = true

[[inputs]]
line = "intruder"
start_tick = 10
end_tick = 40

[[inputs]]
line = "interior_button"
start_tick = 50
end_tick = 52

[[keypad]]
tick = 5
keys = "7452A0"
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.ticks), Some(900));
        assert_eq!(cfg.as_ref().map(|c| c.lighting.exterior), Some(4.0));
        assert_eq!(cfg.as_ref().map(|c| c.inputs.len()), Some(2));
        assert_eq!(
            cfg.as_ref().map(|c| c.inputs[0].line),
            Some(InputLine::Intruder)
        );
        assert_eq!(cfg.as_ref().map(|c| c.access.start_locked), Some(true));
        assert_eq!(
            cfg.as_ref().map(|c| c.keypad[0].keys.as_str()),
            Some("7452A0")
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
ticks = 24
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_input_line_rejected() {
        let toml = r#"
[[inputs]]
line = "doorbell"
start_tick = 0
end_tick = 1
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_zero_ticks() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.ticks = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.ticks"));
    }

    #[test]
    fn validation_catches_out_of_range_battery() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.battery.initial_level = 150.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.initial_level"));
    }

    #[test]
    fn validation_catches_inverted_day() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.solar.sunrise_tick = 1900;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "solar.sunrise_tick"));
    }

    #[test]
    fn validation_catches_empty_window_and_keys() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.inputs.push(InputWindow {
            line: InputLine::Intruder,
            start_tick: 9,
            end_tick: 9,
        });
        cfg.keypad.push(KeypadEntry::new(3, ""));
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "inputs[6].start_tick"));
        assert!(errors.iter().any(|e| e.field == "keypad[0].keys"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn lockout_starts_locked() {
        let cfg = ScenarioConfig::lockout();
        assert!(cfg.dwelling_settings().start_locked);
        assert_eq!(cfg.keypad.len(), 4);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.ticks), Some(4800));
        assert_eq!(cfg.as_ref().map(|c| c.solar.raw_peak), Some(1000));
        assert_eq!(cfg.as_ref().map(|c| c.inputs.len()), Some(0));
    }
}
