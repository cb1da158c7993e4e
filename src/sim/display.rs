//! Status display layout and an in-memory character grid.
//!
//! ```text
//! 0000000000111111
//! 0123456789012345
//! T XXXX ieA LE
//! B XXX S XXX
//! ```
//!
//! `i` interior light on, `e` exterior light on, `A` intruder sensor active,
//! `L` interior button pressed, `E` exterior button pressed.

use std::fmt;

use crate::devices::types::CharacterDisplay;

/// Display width in characters.
pub const COLUMNS: usize = 16;
/// Display height in characters.
pub const ROWS: usize = 2;

/// Everything the status screen shows for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatusSnapshot {
    pub tick: u32,
    pub battery_level: f64,
    pub solar_level: f64,
    pub interior_on: bool,
    pub exterior_on: bool,
    pub intruder_on: bool,
    pub interior_button_on: bool,
    pub exterior_button_on: bool,
}

/// One positioned write to the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayWrite {
    pub col: u8,
    pub row: u8,
    pub text: String,
}

impl DisplayWrite {
    fn new(col: u8, row: u8, text: impl Into<String>) -> Self {
        Self {
            col,
            row,
            text: text.into(),
        }
    }
}

/// Stateless formatter for the status screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusDisplayModel;

impl StatusDisplayModel {
    /// Lays out a snapshot as positioned writes, in drawing order.
    ///
    /// Each numeric field first paints its label padded with spaces, so a
    /// shorter value never leaves digits from a longer one behind. Indicator
    /// cells are always written, with a space when inactive.
    pub fn writes(snapshot: &StatusSnapshot) -> Vec<DisplayWrite> {
        let mut out = Vec::with_capacity(13);
        labelled(&mut out, 0, 0, "T     ", snapshot.tick / 10);
        labelled(&mut out, 0, 1, "B    ", snapshot.battery_level as i64);
        labelled(&mut out, 6, 1, "S    ", snapshot.solar_level as i64);

        out.push(indicator(7, 0, snapshot.interior_on, 'i'));
        out.push(indicator(8, 0, snapshot.exterior_on, 'e'));
        out.push(indicator(9, 0, snapshot.intruder_on, 'A'));
        out.push(indicator(11, 0, snapshot.interior_button_on, 'L'));
        out.push(indicator(12, 0, snapshot.exterior_button_on, 'E'));
        out
    }

    /// Paints a snapshot onto a display.
    pub fn render(snapshot: &StatusSnapshot, display: &mut impl CharacterDisplay) {
        for w in Self::writes(snapshot) {
            display.print_at(w.col, w.row, &w.text);
        }
    }
}

fn labelled(
    out: &mut Vec<DisplayWrite>,
    col: u8,
    row: u8,
    clear: &str,
    value: impl fmt::Display,
) {
    out.push(DisplayWrite::new(col, row, clear));
    out.push(DisplayWrite::new(col + 2, row, value.to_string()));
}

fn indicator(col: u8, row: u8, on: bool, symbol: char) -> DisplayWrite {
    DisplayWrite::new(col, row, if on { symbol } else { ' ' })
}

/// A 16x2 character display held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextGrid {
    cells: [[char; COLUMNS]; ROWS],
}

impl Default for TextGrid {
    fn default() -> Self {
        Self {
            cells: [[' '; COLUMNS]; ROWS],
        }
    }
}

impl TextGrid {
    /// Returns row `row` as a 16-character string.
    ///
    /// # Panics
    ///
    /// Panics if `row >= ROWS`.
    pub fn row(&self, row: usize) -> String {
        self.cells[row].iter().collect()
    }

    /// Returns the character at (`col`, `row`).
    pub fn cell(&self, col: usize, row: usize) -> char {
        self.cells[row][col]
    }
}

impl CharacterDisplay for TextGrid {
    fn clear(&mut self) {
        self.cells = [[' '; COLUMNS]; ROWS];
    }

    /// Writes past the right edge or below the last row are dropped.
    fn print_at(&mut self, col: u8, row: u8, text: &str) {
        let Some(line) = self.cells.get_mut(usize::from(row)) else {
            return;
        };
        for (cell, ch) in line.iter_mut().skip(usize::from(col)).zip(text.chars()) {
            *cell = ch;
        }
    }
}

impl fmt::Display for TextGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.row(0), self.row(1))
    }
}
