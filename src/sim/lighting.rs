//! Interior and exterior lighting driven by push buttons and the battery band.

use serde::Deserialize;

use crate::devices::battery::PowerBand;
use crate::devices::buzzer::AlarmSignal;
use crate::devices::pin::{DimmableOutput, FULL_BRIGHTNESS, LatchedOutput};
use crate::devices::types::{DigitalOutput, Light, PwmOutput};

/// Interior brightness while the battery is critical.
pub const CRITICAL_BRIGHTNESS: u8 = 2;
/// Interior brightness while the battery is low.
pub const LOW_BRIGHTNESS: u8 = 63;

/// Interior brightness allowed in `band`.
pub fn derated_brightness(band: PowerBand) -> u8 {
    match band {
        PowerBand::Critical => CRITICAL_BRIGHTNESS,
        PowerBand::Low => LOW_BRIGHTNESS,
        PowerBand::Middle | PowerBand::NearFull | PowerBand::Full => FULL_BRIGHTNESS,
    }
}

/// Battery drawn by each light per charge cycle while it is on.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PowerUsage {
    pub interior: f64,
    pub exterior: f64,
}

impl Default for PowerUsage {
    fn default() -> Self {
        Self {
            interior: 1.0,
            exterior: 3.0,
        }
    }
}

/// The exterior floodlight as seen by the security monitor.
pub trait Floodlight {
    /// Turns the floodlight on for an intrusion.
    fn force_on(&mut self);
    /// Forgets that a person switched the floodlight on.
    fn clear_override(&mut self);
    /// Turns the floodlight off unless a person switched it on.
    fn release(&mut self);
}

/// Button-toggled lights with brightness derating.
#[derive(Debug)]
pub struct LightingController<P, O> {
    interior: DimmableOutput<P>,
    exterior: LatchedOutput<O>,
    manual_override: bool,
    usage: PowerUsage,
}

impl<P: PwmOutput, O: DigitalOutput> LightingController<P, O> {
    pub fn new(interior: DimmableOutput<P>, exterior: LatchedOutput<O>, usage: PowerUsage) -> Self {
        Self {
            interior,
            exterior,
            manual_override: false,
            usage,
        }
    }

    /// Runs one lighting cycle.
    ///
    /// A button toggles its light on the sample where it became pressed.
    /// The interior light is then relit at the brightness `band` allows.
    /// While any light is on, a critical battery switches the exterior light
    /// off and asks for the critical alarm, and a low battery asks for the
    /// low alarm.
    ///
    /// # Arguments
    ///
    /// * `interior_pressed` - Interior button went from released to pressed
    /// * `exterior_pressed` - Exterior button went from released to pressed
    /// * `band` - Battery band from the last charge cycle
    ///
    /// # Returns
    ///
    /// The alarm to raise, if any.
    pub fn update(
        &mut self,
        interior_pressed: bool,
        exterior_pressed: bool,
        band: PowerBand,
    ) -> Option<AlarmSignal> {
        if interior_pressed {
            self.interior.toggle();
        }
        if exterior_pressed {
            self.exterior.toggle();
            if self.exterior.is_on() {
                self.manual_override = true;
            }
        }

        if self.interior.is_on() {
            self.interior.set_brightness(derated_brightness(band));
            self.interior.turn_on();
        }

        if !self.interior.is_on() && !self.exterior.is_on() {
            return None;
        }
        match band {
            PowerBand::Critical => {
                self.exterior.turn_off();
                Some(AlarmSignal::Critical)
            }
            PowerBand::Low => Some(AlarmSignal::Low),
            _ => None,
        }
    }

    pub fn interior_on(&self) -> bool {
        self.interior.is_on()
    }

    pub fn interior_brightness(&self) -> u8 {
        self.interior.brightness()
    }

    pub fn exterior_on(&self) -> bool {
        self.exterior.is_on()
    }

    /// Whether a person switched the exterior light on.
    pub fn manual_override(&self) -> bool {
        self.manual_override
    }

    pub fn usage(&self) -> PowerUsage {
        self.usage
    }
}

impl<P: PwmOutput, O: DigitalOutput> Floodlight for LightingController<P, O> {
    fn force_on(&mut self) {
        self.exterior.turn_on();
    }

    fn clear_override(&mut self) {
        self.manual_override = false;
    }

    fn release(&mut self) {
        if !self.manual_override {
            self.exterior.turn_off();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::sim::{SimDuty, SimLine};
    use crate::devices::types::Polarity;

    fn controller() -> (LightingController<SimDuty, SimLine>, SimDuty, SimLine) {
        let duty = SimDuty::default();
        let flood = SimLine::default();
        let lights = LightingController::new(
            DimmableOutput::new(duty.clone()),
            LatchedOutput::new(flood.clone(), Polarity::HighIsOn),
            PowerUsage::default(),
        );
        (lights, duty, flood)
    }

    #[test]
    fn press_toggles_interior() {
        let (mut lights, duty, _) = controller();
        lights.update(true, false, PowerBand::Full);
        assert!(lights.interior_on());
        assert_eq!(duty.get(), 255);
        lights.update(false, false, PowerBand::Full);
        assert!(lights.interior_on());
        lights.update(true, false, PowerBand::Full);
        assert!(!lights.interior_on());
        assert_eq!(duty.get(), 0);
    }

    #[test]
    fn brightness_follows_band_every_cycle() {
        let (mut lights, duty, _) = controller();
        lights.update(true, false, PowerBand::Middle);
        lights.update(false, false, PowerBand::Low);
        assert_eq!(duty.get(), 63);
        lights.update(false, false, PowerBand::Critical);
        assert_eq!(duty.get(), 2);
        lights.update(false, false, PowerBand::NearFull);
        assert_eq!(duty.get(), 255);
    }

    #[test]
    fn manual_exterior_sets_override() {
        let (mut lights, _, flood) = controller();
        lights.update(false, true, PowerBand::Full);
        assert!(flood.get());
        assert!(lights.manual_override());
        lights.release();
        assert!(lights.exterior_on());
        lights.clear_override();
        lights.release();
        assert!(!lights.exterior_on());
    }

    #[test]
    fn critical_band_kills_exterior_and_alarms() {
        let (mut lights, _, flood) = controller();
        lights.update(true, true, PowerBand::Full);
        let request = lights.update(false, false, PowerBand::Critical);
        assert_eq!(request, Some(AlarmSignal::Critical));
        assert!(!flood.get());
        assert!(lights.interior_on());
        assert_eq!(lights.interior_brightness(), CRITICAL_BRIGHTNESS);
    }

    #[test]
    fn low_band_alarms_only_with_lights_on() {
        let (mut lights, _, _) = controller();
        assert_eq!(lights.update(false, false, PowerBand::Low), None);
        assert_eq!(
            lights.update(true, false, PowerBand::Low),
            Some(AlarmSignal::Low)
        );
        assert_eq!(lights.update(false, false, PowerBand::Middle), None);
    }
}
