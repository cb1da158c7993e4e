//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::ScenarioConfig;
use crate::sim::access::is_keypad_key;
use crate::sim::event::InputLine;

use super::runtime::App;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
/// Keypad characters go to the simulated access panel, so presets live on
/// the function keys.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char(' ') => app.toggle_pause(),
        KeyCode::Char('+' | '=') | KeyCode::Right => app.speed_up(),
        KeyCode::Char('-') | KeyCode::Left => app.speed_down(),
        KeyCode::Char('r') => app.restart(),
        KeyCode::Char('i') => app.press(InputLine::InteriorButton),
        KeyCode::Char('e') => app.press(InputLine::ExteriorButton),
        KeyCode::Char('m') => app.toggle_intruder(),
        KeyCode::F(n @ 1..=4) => {
            if let Some(name) = ScenarioConfig::PRESETS.get(usize::from(n - 1)) {
                app.switch_preset(name);
            }
        }
        KeyCode::Char(c) => {
            let c = c.to_ascii_uppercase();
            if is_keypad_key(c) {
                app.press_key(c);
            }
        }
        _ => {}
    }
}
