//! Hardware capability traits consumed by the controller core.
//!
//! The core never touches pins directly. Each subsystem is handed the
//! narrowest capability it needs, and a [`Board`] names one concrete
//! implementation of every capability so the whole dwelling can be built
//! generically over real hardware or the simulated board.

/// Which electrical level counts as logically "on".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// High level means on (pull-down wiring, active-high outputs).
    HighIsOn,
    /// Low level means on (pull-up buttons, active-low outputs).
    LowIsOn,
}

impl Polarity {
    /// Converts an electrical level into a logical on/off state.
    pub fn is_on(self, high: bool) -> bool {
        match self {
            Self::HighIsOn => high,
            Self::LowIsOn => !high,
        }
    }

    /// Electrical level that represents the given logical state.
    pub fn level_for(self, on: bool) -> bool {
        match self {
            Self::HighIsOn => on,
            Self::LowIsOn => !on,
        }
    }
}

/// A boolean sensor line.
pub trait DigitalInput {
    /// Reads the current electrical level (`true` = high).
    fn read_high(&mut self) -> bool;
}

/// A boolean actuator line.
pub trait DigitalOutput {
    /// Drives the line high (`true`) or low (`false`).
    fn write_high(&mut self, high: bool);
}

/// A PWM-capable output with an 8-bit duty cycle.
pub trait PwmOutput {
    /// Writes a duty cycle in `0..=255`.
    fn write_duty(&mut self, duty: u8);
}

/// A 10-bit analog sampler.
pub trait AnalogInput {
    /// Returns a raw sample in `0..=1023`.
    fn read_raw(&mut self) -> u16;
}

/// Tone generator driving a passive buzzer.
pub trait ToneOutput {
    /// Starts a tone at `frequency_hz` lasting `duration_ms`.
    fn tone(&mut self, frequency_hz: u32, duration_ms: u32);

    /// Silences any tone in progress.
    fn no_tone(&mut self);
}

/// A character display addressed by column and row.
pub trait CharacterDisplay {
    /// Blanks every cell.
    fn clear(&mut self);

    /// Prints `text` starting at (`col`, `row`).
    fn print_at(&mut self, col: u8, row: u8, text: &str);
}

/// Non-blocking key source for the access keypad.
pub trait KeypadSource {
    /// Returns the next pressed key, if one is waiting.
    fn poll_key(&mut self) -> Option<char>;
}

/// On/off capability shared by every light variant.
pub trait Light {
    /// Whether the light was last commanded on.
    fn is_on(&self) -> bool;
    /// Switches the light on.
    fn turn_on(&mut self);
    /// Switches the light off.
    fn turn_off(&mut self);
}

/// One concrete implementation of every capability the dwelling needs.
pub trait Board {
    type Input: DigitalInput;
    type Output: DigitalOutput;
    type Pwm: PwmOutput;
    type Analog: AnalogInput;
    type Buzzer: ToneOutput;
    type Display: CharacterDisplay;
    type Keypad: KeypadSource;
}
