use crate::devices::battery::PowerBand;
use crate::devices::pin::{LightColor, TwoColorLight};
use crate::devices::types::{DigitalOutput, Light};

/// Blink period of the battery light in the low and near-full bands.
pub const BLINK_TICKS: u32 = 5;

/// Red/green battery status light.
///
/// Green near full or full, red when low or critical, dark in the middle
/// band. Low and near-full blink by going dark every fifth tick.
#[derive(Debug)]
pub struct BatteryIndicator<O> {
    light: TwoColorLight<O>,
}

impl<O: DigitalOutput> BatteryIndicator<O> {
    pub fn new(light: TwoColorLight<O>) -> Self {
        Self { light }
    }

    pub fn update(&mut self, band: PowerBand, tick: u32) {
        match band {
            PowerBand::NearFull | PowerBand::Full => self.light.turn_on_green(),
            PowerBand::Critical | PowerBand::Low => self.light.turn_on_red(),
            PowerBand::Middle => self.light.turn_off(),
        }

        let blinking = matches!(band, PowerBand::Low | PowerBand::NearFull);
        if blinking && tick % BLINK_TICKS == 0 {
            if self.light.is_on() {
                self.light.turn_off();
            } else {
                self.light.turn_on();
            }
        }
    }

    pub fn color(&self) -> Option<LightColor> {
        self.light.color()
    }
}
