//! Edge-detecting inputs and latched outputs.
//!
//! No debounce filtering is applied: a level change between two samples is
//! reported as a change, however brief.

use super::types::{DigitalInput, DigitalOutput, Light, Polarity, PwmOutput};

/// Full-brightness duty cycle for a dimmable output.
pub const FULL_BRIGHTNESS: u8 = 255;

/// A boolean sensor line that remembers its previous sample.
///
/// # Examples
///
/// ```
/// use dwelling_sim::devices::pin::EdgeDetectedInput;
/// use dwelling_sim::devices::sim::SimLine;
/// use dwelling_sim::devices::types::Polarity;
///
/// let line = SimLine::new(true);
/// let mut button = EdgeDetectedInput::new(line.clone(), Polarity::LowIsOn);
///
/// assert!(!button.sample());
/// line.set(false); // pressed
/// assert!(button.sample());
/// assert!(button.has_changed());
/// assert!(button.sample());
/// assert!(!button.has_changed());
/// ```
#[derive(Debug)]
pub struct EdgeDetectedInput<I> {
    line: I,
    polarity: Polarity,
    previous_high: bool,
    current_high: bool,
    changed: bool,
}

impl<I: DigitalInput> EdgeDetectedInput<I> {
    /// Wraps a line. The stored previous level starts at the electrical
    /// "off" level, so a line that is already on at the first sample reports
    /// a change.
    pub fn new(line: I, polarity: Polarity) -> Self {
        let off = polarity.level_for(false);
        Self {
            line,
            polarity,
            previous_high: off,
            current_high: off,
            changed: false,
        }
    }

    /// Reads the line, updates the change flag and returns the logical state.
    pub fn sample(&mut self) -> bool {
        let high = self.line.read_high();
        self.changed = high != self.current_high;
        self.previous_high = self.current_high;
        self.current_high = high;
        self.is_on()
    }

    /// Logical state as of the last [`sample`](Self::sample).
    pub fn is_on(&self) -> bool {
        self.polarity.is_on(self.current_high)
    }

    pub fn is_off(&self) -> bool {
        !self.is_on()
    }

    /// Whether the last sample differed from the one before it.
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    /// Logical state of the sample before the last one.
    pub fn was_on(&self) -> bool {
        self.polarity.is_on(self.previous_high)
    }
}

/// A boolean actuator line that remembers the last value written.
#[derive(Debug)]
pub struct LatchedOutput<O> {
    line: O,
    polarity: Polarity,
    on: bool,
}

impl<O: DigitalOutput> LatchedOutput<O> {
    /// Wraps a line and drives it off.
    pub fn new(line: O, polarity: Polarity) -> Self {
        let mut output = Self {
            line,
            polarity,
            on: false,
        };
        output.set(false);
        output
    }

    /// Drives the line to the given logical state.
    pub fn set(&mut self, on: bool) {
        self.on = on;
        self.line.write_high(self.polarity.level_for(on));
    }

    /// Flips the stored state and writes it.
    pub fn toggle(&mut self) {
        self.set(!self.on);
    }

    pub fn is_off(&self) -> bool {
        !self.on
    }
}

impl<O: DigitalOutput> Light for LatchedOutput<O> {
    fn is_on(&self) -> bool {
        self.on
    }

    fn turn_on(&mut self) {
        self.set(true);
    }

    fn turn_off(&mut self) {
        self.set(false);
    }
}

/// A PWM output with a stored intensity level.
///
/// The level only takes effect on the next [`Light::turn_on`].
#[derive(Debug)]
pub struct DimmableOutput<P> {
    pwm: P,
    brightness: u8,
    on: bool,
}

impl<P: PwmOutput> DimmableOutput<P> {
    /// Wraps a PWM line at full brightness and drives it off.
    pub fn new(pwm: P) -> Self {
        let mut output = Self {
            pwm,
            brightness: FULL_BRIGHTNESS,
            on: false,
        };
        output.turn_off();
        output
    }

    /// Sets the level used by the next `turn_on`.
    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn toggle(&mut self) {
        if self.on {
            self.turn_off();
        } else {
            self.turn_on();
        }
    }
}

impl<P: PwmOutput> Light for DimmableOutput<P> {
    fn is_on(&self) -> bool {
        self.on
    }

    fn turn_on(&mut self) {
        self.pwm.write_duty(self.brightness);
        self.on = true;
    }

    fn turn_off(&mut self) {
        self.pwm.write_duty(0);
        self.on = false;
    }
}

/// Color currently shown by a [`TwoColorLight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightColor {
    Red,
    Green,
}

/// A bi-color LED with separate red and green lines.
///
/// Not a kind of single-color light: it carries a color and remembers the
/// last one shown so it can be relit in the same color.
#[derive(Debug)]
pub struct TwoColorLight<O> {
    red: O,
    green: O,
    shown: Option<LightColor>,
    last: LightColor,
}

impl<O: DigitalOutput> TwoColorLight<O> {
    /// Wraps the two lines (active high) and drives both low.
    pub fn new(red: O, green: O) -> Self {
        let mut light = Self {
            red,
            green,
            shown: None,
            last: LightColor::Green,
        };
        light.turn_off();
        light
    }

    pub fn turn_on_red(&mut self) {
        self.show(LightColor::Red);
    }

    pub fn turn_on_green(&mut self) {
        self.show(LightColor::Green);
    }

    /// Color currently lit, or `None` when dark.
    pub fn color(&self) -> Option<LightColor> {
        self.shown
    }

    /// Whether red was the last color lit.
    pub fn was_red(&self) -> bool {
        self.last == LightColor::Red
    }

    fn show(&mut self, color: LightColor) {
        self.red.write_high(color == LightColor::Red);
        self.green.write_high(color == LightColor::Green);
        self.shown = Some(color);
        self.last = color;
    }
}

impl<O: DigitalOutput> Light for TwoColorLight<O> {
    fn is_on(&self) -> bool {
        self.shown.is_some()
    }

    /// Relights in the last color shown.
    fn turn_on(&mut self) {
        self.show(self.last);
    }

    fn turn_off(&mut self) {
        self.red.write_high(false);
        self.green.write_high(false);
        self.shown = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::sim::{SimDuty, SimLine};

    #[test]
    fn first_sample_of_an_active_line_is_a_change() {
        let line = SimLine::new(true);
        let mut sensor = EdgeDetectedInput::new(line, Polarity::HighIsOn);
        assert!(sensor.sample());
        assert!(sensor.has_changed());
    }

    #[test]
    fn change_flag_is_not_sticky() {
        let line = SimLine::new(false);
        let mut sensor = EdgeDetectedInput::new(line.clone(), Polarity::HighIsOn);
        assert!(!sensor.sample());
        assert!(!sensor.has_changed());

        line.set(true);
        assert!(sensor.sample());
        assert!(sensor.has_changed());
        assert!(!sensor.was_on());

        assert!(sensor.sample());
        assert!(!sensor.has_changed());

        line.set(false);
        assert!(!sensor.sample());
        assert!(sensor.has_changed());
        assert!(sensor.is_off());
    }

    #[test]
    fn single_sample_glitch_is_reported_twice() {
        // no debounce: a one-sample blip changes on the way in and out
        let line = SimLine::new(false);
        let mut sensor = EdgeDetectedInput::new(line.clone(), Polarity::HighIsOn);
        sensor.sample();
        line.set(true);
        sensor.sample();
        assert!(sensor.has_changed());
        line.set(false);
        sensor.sample();
        assert!(sensor.has_changed());
    }

    #[test]
    fn latched_output_writes_polarity_adjusted_levels() {
        let line = SimLine::new(false);
        let mut out = LatchedOutput::new(line.clone(), Polarity::LowIsOn);
        assert!(line.get(), "active-low output starts high (off)");
        assert!(out.is_off());

        out.turn_on();
        assert!(!line.get());
        assert!(out.is_on());

        out.toggle();
        assert!(line.get());
        assert!(!out.is_on());
    }

    #[test]
    fn dimmable_output_applies_level_on_next_turn_on() {
        let duty = SimDuty::default();
        let mut light = DimmableOutput::new(duty.clone());
        assert_eq!(duty.get(), 0);

        light.turn_on();
        assert_eq!(duty.get(), FULL_BRIGHTNESS);

        light.set_brightness(63);
        assert_eq!(duty.get(), FULL_BRIGHTNESS);
        light.turn_on();
        assert_eq!(duty.get(), 63);

        light.toggle();
        assert_eq!(duty.get(), 0);
        assert!(!light.is_on());
    }

    #[test]
    fn two_color_light_relights_last_color() {
        let red = SimLine::new(false);
        let green = SimLine::new(false);
        let mut light = TwoColorLight::new(red.clone(), green.clone());
        assert!(!light.is_on());

        light.turn_on_red();
        assert!(red.get() && !green.get());
        assert!(light.was_red());

        light.turn_off();
        assert!(!red.get() && !green.get());
        assert_eq!(light.color(), None);

        light.turn_on();
        assert_eq!(light.color(), Some(LightColor::Red));

        light.turn_on_green();
        assert!(!red.get() && green.get());
        assert!(!light.was_red());
    }
}
