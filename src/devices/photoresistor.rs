use super::types::AnalogInput;

/// Raw reading mapped to zero light.
pub const RAW_DARK: i32 = 200;
/// Raw reading mapped to full light.
pub const RAW_BRIGHT: i32 = 1000;

/// Converts a raw photoresistor sample to percent light (0.0 to 100.0).
///
/// The raw value is mapped linearly onto one byte with truncating integer
/// arithmetic, clamped to `0..=255`, then divided by 2.55. Clamping happens
/// after the map, so a reading outside `[200, 1000]` maps out of range first
/// and is pinned to the nearest end.
///
/// # Examples
///
/// ```
/// use dwelling_sim::devices::photoresistor::percent_light;
///
/// assert_eq!(percent_light(200), 0.0);
/// assert_eq!(percent_light(1000), 100.0);
/// assert_eq!(percent_light(1023), 100.0);
/// assert_eq!(percent_light(0), 0.0);
/// ```
pub fn percent_light(raw: u16) -> f64 {
    let byte = (i32::from(raw) - RAW_DARK) * 255 / (RAW_BRIGHT - RAW_DARK);
    f64::from(byte.clamp(0, 255)) / 2.55
}

/// Solar-array light sensor built on an analog input.
#[derive(Debug)]
pub struct PhotoResistor<A> {
    input: A,
    value: f64,
}

impl<A: AnalogInput> PhotoResistor<A> {
    pub fn new(input: A) -> Self {
        Self { input, value: 0.0 }
    }

    /// Samples the sensor and returns percent light.
    pub fn read(&mut self) -> f64 {
        self.value = percent_light(self.input.read_raw());
        self.value
    }

    /// Percent light from the most recent [`read`](Self::read).
    pub fn last_value(&self) -> f64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::sim::SimAnalog;

    #[test]
    fn midpoint_truncates_before_scaling() {
        // (600 - 200) * 255 / 800 = 127 (truncated), 127 / 2.55
        assert!((percent_light(600) - 127.0 / 2.55).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_readings_are_pinned() {
        assert_eq!(percent_light(150), 0.0);
        assert_eq!(percent_light(1023), 100.0);
    }

    #[test]
    fn read_retains_last_value() {
        let analog = SimAnalog::new(1000);
        let mut sensor = PhotoResistor::new(analog.clone());
        assert_eq!(sensor.last_value(), 0.0);
        assert_eq!(sensor.read(), 100.0);
        analog.set(200);
        assert_eq!(sensor.last_value(), 100.0);
        assert_eq!(sensor.read(), 0.0);
    }
}
