//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use dwelling_sim::config::ScenarioConfig;
use dwelling_sim::devices::solar::SolarProfile;
use dwelling_sim::sim::engine::Engine;
use dwelling_sim::sim::event::{InputWindow, KeypadEntry};
use dwelling_sim::sim::scheduler::DwellingSettings;
use dwelling_sim::sim::types::TickRecord;

/// Solar profile that always reads full darkness.
pub fn dark() -> SolarProfile {
    SolarProfile::new(1, 0, 1, 0, 0, 0.0, 0)
}

/// Solar profile that always reads full light (100 %).
pub fn noon() -> SolarProfile {
    SolarProfile::new(1, 0, 1, 1000, 1000, 0.0, 0)
}

/// Settings with the given starting battery level, unlocked.
pub fn settings(initial_battery: f64) -> DwellingSettings {
    DwellingSettings {
        initial_battery,
        ..DwellingSettings::default()
    }
}

/// Engine in the dark with scripted inputs and keypad entries.
pub fn engine_with(
    settings: DwellingSettings,
    inputs: Vec<InputWindow>,
    keypad: Vec<KeypadEntry>,
    ticks: u32,
) -> Engine {
    Engine::new(settings, dark(), inputs, keypad, ticks)
}

/// Runs a built-in preset to completion.
pub fn run_preset(name: &str) -> Vec<TickRecord> {
    let scenario = ScenarioConfig::from_preset(name).expect("preset should exist");
    assert!(scenario.validate().is_empty(), "preset {name} should validate");
    Engine::from_config(&scenario).run()
}
