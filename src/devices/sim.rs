//! Simulated board for host runs and tests.
//!
//! Every pin is a cheap clonable handle onto shared state: the controller
//! owns one clone, the simulation harness keeps another to drive inputs and
//! observe outputs. Everything is single-threaded, so `Rc` cells suffice.

use std::cell::{Cell, Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use super::types::{
    AnalogInput, Board, CharacterDisplay, DigitalInput, DigitalOutput, KeypadSource, PwmOutput,
    ToneOutput,
};
use crate::sim::display::TextGrid;

/// Shared digital line usable as input or output.
#[derive(Debug, Clone, Default)]
pub struct SimLine(Rc<Cell<bool>>);

impl SimLine {
    pub fn new(high: bool) -> Self {
        Self(Rc::new(Cell::new(high)))
    }

    pub fn set(&self, high: bool) {
        self.0.set(high);
    }

    pub fn get(&self) -> bool {
        self.0.get()
    }
}

impl DigitalInput for SimLine {
    fn read_high(&mut self) -> bool {
        self.0.get()
    }
}

impl DigitalOutput for SimLine {
    fn write_high(&mut self, high: bool) {
        self.0.set(high);
    }
}

/// Shared PWM duty cycle.
#[derive(Debug, Clone, Default)]
pub struct SimDuty(Rc<Cell<u8>>);

impl SimDuty {
    pub fn get(&self) -> u8 {
        self.0.get()
    }
}

impl PwmOutput for SimDuty {
    fn write_duty(&mut self, duty: u8) {
        self.0.set(duty);
    }
}

/// Shared raw analog value.
#[derive(Debug, Clone, Default)]
pub struct SimAnalog(Rc<Cell<u16>>);

impl SimAnalog {
    pub fn new(raw: u16) -> Self {
        Self(Rc::new(Cell::new(raw)))
    }

    pub fn set(&self, raw: u16) {
        self.0.set(raw.min(1023));
    }

    pub fn get(&self) -> u16 {
        self.0.get()
    }
}

impl AnalogInput for SimAnalog {
    fn read_raw(&mut self) -> u16 {
        self.0.get()
    }
}

/// One tone played on the simulated buzzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneEvent {
    pub frequency_hz: u32,
    pub duration_ms: u32,
}

#[derive(Debug, Default)]
struct BuzzerLog {
    tones: Vec<ToneEvent>,
    silenced: u32,
}

/// Buzzer that records every tone it is asked to play.
#[derive(Debug, Clone, Default)]
pub struct SimBuzzer(Rc<RefCell<BuzzerLog>>);

impl SimBuzzer {
    /// All tones played so far, oldest first.
    pub fn tones(&self) -> Vec<ToneEvent> {
        self.0.borrow().tones.clone()
    }

    pub fn tone_count(&self) -> usize {
        self.0.borrow().tones.len()
    }

    /// Number of `no_tone` calls.
    pub fn silenced(&self) -> u32 {
        self.0.borrow().silenced
    }
}

impl ToneOutput for SimBuzzer {
    fn tone(&mut self, frequency_hz: u32, duration_ms: u32) {
        self.0.borrow_mut().tones.push(ToneEvent {
            frequency_hz,
            duration_ms,
        });
    }

    fn no_tone(&mut self) {
        self.0.borrow_mut().silenced += 1;
    }
}

/// Keypad fed from a queue of pending key presses.
#[derive(Debug, Clone, Default)]
pub struct SimKeypad(Rc<RefCell<VecDeque<char>>>);

impl SimKeypad {
    /// Queues a key press.
    pub fn press(&self, key: char) {
        self.0.borrow_mut().push_back(key);
    }

    /// Queues every character of `keys` in order.
    pub fn press_all(&self, keys: &str) {
        self.0.borrow_mut().extend(keys.chars());
    }

    pub fn pending(&self) -> usize {
        self.0.borrow().len()
    }
}

impl KeypadSource for SimKeypad {
    fn poll_key(&mut self) -> Option<char> {
        self.0.borrow_mut().pop_front()
    }
}

/// Shared 16x2 character display.
#[derive(Debug, Clone, Default)]
pub struct SimDisplay(Rc<RefCell<TextGrid>>);

impl SimDisplay {
    /// Borrows the current screen contents.
    pub fn grid(&self) -> Ref<'_, TextGrid> {
        self.0.borrow()
    }
}

impl CharacterDisplay for SimDisplay {
    fn clear(&mut self) {
        self.0.borrow_mut().clear();
    }

    fn print_at(&mut self, col: u8, row: u8, text: &str) {
        self.0.borrow_mut().print_at(col, row, text);
    }
}

/// Capability set backed by the shared-cell simulation types.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimBoard;

impl Board for SimBoard {
    type Input = SimLine;
    type Output = SimLine;
    type Pwm = SimDuty;
    type Analog = SimAnalog;
    type Buzzer = SimBuzzer;
    type Display = SimDisplay;
    type Keypad = SimKeypad;
}
