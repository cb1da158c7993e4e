//! The dwelling controller and its per-tick schedule.

use crate::devices::battery::{BatteryModel, PowerBand};
use crate::devices::buzzer::AlarmSignaler;
use crate::devices::photoresistor::PhotoResistor;
use crate::devices::pin::{DimmableOutput, EdgeDetectedInput, LatchedOutput, TwoColorLight};
use crate::devices::types::{Board, DigitalInput, Polarity};

use super::access::AccessPanel;
use super::display::{StatusDisplayModel, StatusSnapshot};
use super::indicator::BatteryIndicator;
use super::lighting::{LightingController, PowerUsage};
use super::security::SecurityMonitor;
use super::types::TickRecord;

/// Battery accounting runs on ticks divisible by this.
pub const CHARGE_PERIOD_TICKS: u32 = 10;

/// Every line the dwelling is wired to.
pub struct DwellingPins<B: Board> {
    /// Pull-up push button, pressed pulls low.
    pub interior_button: B::Input,
    /// Pull-up push button, pressed pulls low.
    pub exterior_button: B::Input,
    /// Motion sensor, high when triggered.
    pub intruder: B::Input,
    pub interior_light: B::Pwm,
    pub exterior_light: B::Output,
    pub alert_light: B::Output,
    pub battery_red: B::Output,
    pub battery_green: B::Output,
    pub lock_red: B::Output,
    pub lock_green: B::Output,
    pub solar: B::Analog,
    pub buzzer: B::Buzzer,
    pub display: B::Display,
    pub keypad: B::Keypad,
}

/// Start-up parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DwellingSettings {
    /// Battery level at power-on (0 to 100).
    pub initial_battery: f64,
    pub usage: PowerUsage,
    /// Require the PIN before the status display takes over.
    pub start_locked: bool,
}

impl Default for DwellingSettings {
    fn default() -> Self {
        Self {
            initial_battery: 0.0,
            usage: PowerUsage::default(),
            start_locked: false,
        }
    }
}

/// Buttons and sensor as sampled at the start of a tick.
#[derive(Debug, Clone, Copy, Default)]
struct Inputs {
    interior_on: bool,
    interior_pressed: bool,
    exterior_on: bool,
    exterior_pressed: bool,
    intruder_on: bool,
}

/// A button went from released to pressed on its latest sample.
fn pressed<I: DigitalInput>(button: &EdgeDetectedInput<I>) -> bool {
    button.has_changed() && button.is_on()
}

/// The home controller.
///
/// [`tick`](Self::tick) is the only entry point after construction and must
/// be called with a strictly increasing tick count. All state is owned here
/// and mutated only from within a tick.
pub struct Dwelling<B: Board> {
    interior_button: EdgeDetectedInput<B::Input>,
    exterior_button: EdgeDetectedInput<B::Input>,
    intruder: EdgeDetectedInput<B::Input>,
    solar: PhotoResistor<B::Analog>,
    battery: BatteryModel,
    alarm: AlarmSignaler<B::Buzzer>,
    lighting: LightingController<B::Pwm, B::Output>,
    security: SecurityMonitor<B::Output>,
    battery_light: BatteryIndicator<B::Output>,
    access: AccessPanel<B::Keypad, B::Output>,
    display: B::Display,
}

impl<B: Board> Dwelling<B> {
    /// Wires up every subsystem. Outputs are driven to their off state.
    pub fn new(pins: DwellingPins<B>, settings: DwellingSettings) -> Self {
        Self {
            interior_button: EdgeDetectedInput::new(pins.interior_button, Polarity::LowIsOn),
            exterior_button: EdgeDetectedInput::new(pins.exterior_button, Polarity::LowIsOn),
            intruder: EdgeDetectedInput::new(pins.intruder, Polarity::HighIsOn),
            solar: PhotoResistor::new(pins.solar),
            battery: BatteryModel::new(settings.initial_battery),
            alarm: AlarmSignaler::new(pins.buzzer),
            lighting: LightingController::new(
                DimmableOutput::new(pins.interior_light),
                LatchedOutput::new(pins.exterior_light, Polarity::HighIsOn),
                settings.usage,
            ),
            security: SecurityMonitor::new(LatchedOutput::new(
                pins.alert_light,
                Polarity::HighIsOn,
            )),
            battery_light: BatteryIndicator::new(TwoColorLight::new(
                pins.battery_red,
                pins.battery_green,
            )),
            access: AccessPanel::new(
                pins.keypad,
                TwoColorLight::new(pins.lock_red, pins.lock_green),
                settings.start_locked,
            ),
            display: pins.display,
        }
    }

    /// Runs one tick.
    ///
    /// Inputs are sampled once, then: access panel, status display and
    /// battery light, alarm timeout, lighting, battery accounting every
    /// tenth tick, and finally security. Lighting sees the band left by the
    /// previous charge cycle; security sees the band after this one.
    pub fn tick(&mut self, tick: u32) -> TickRecord {
        let inputs = self.sample_inputs();
        let solar = self.solar.read();
        let tones_before = self.alarm.tones_emitted();

        self.access.poll(tick, &mut self.display);
        if !self.access.owns_display() {
            let snapshot = self.status_snapshot(tick, &inputs);
            StatusDisplayModel::render(&snapshot, &mut self.display);
        }
        self.battery_light.update(self.battery.power_level(), tick);

        self.alarm.tick(tick);

        let band = self.battery.power_level();
        if let Some(signal) =
            self.lighting
                .update(inputs.interior_pressed, inputs.exterior_pressed, band)
        {
            self.alarm.alarm(signal, tick);
        }

        if tick % CHARGE_PERIOD_TICKS == 0 {
            self.charge_and_use(solar);
        }

        self.security.evaluate(
            inputs.intruder_on,
            self.battery.power_level(),
            tick,
            &mut self.lighting,
        );

        self.record(tick, &inputs, tones_before)
    }

    fn sample_inputs(&mut self) -> Inputs {
        let interior_on = self.interior_button.sample();
        let exterior_on = self.exterior_button.sample();
        let intruder_on = self.intruder.sample();
        Inputs {
            interior_on,
            interior_pressed: pressed(&self.interior_button),
            exterior_on,
            exterior_pressed: pressed(&self.exterior_button),
            intruder_on,
        }
    }

    fn charge_and_use(&mut self, solar: f64) {
        self.battery.charge_battery(solar);
        let usage = self.lighting.usage();
        if self.lighting.interior_on() {
            self.battery.use_power(usage.interior);
        }
        if self.lighting.exterior_on() {
            self.battery.use_power(usage.exterior);
        }
    }

    fn status_snapshot(&self, tick: u32, inputs: &Inputs) -> StatusSnapshot {
        StatusSnapshot {
            tick,
            battery_level: self.battery.level(),
            solar_level: self.solar.last_value(),
            interior_on: self.lighting.interior_on(),
            exterior_on: self.lighting.exterior_on(),
            intruder_on: inputs.intruder_on,
            interior_button_on: inputs.interior_on,
            exterior_button_on: inputs.exterior_on,
        }
    }

    fn record(&self, tick: u32, inputs: &Inputs, tones_before: u32) -> TickRecord {
        TickRecord {
            tick,
            seconds: TickRecord::seconds_at(tick),
            battery_level: self.battery.level(),
            charging: self.battery.is_charging(),
            band: self.battery.power_level(),
            solar_pct: self.solar.last_value(),
            interior_on: self.lighting.interior_on(),
            interior_brightness: self.lighting.interior_brightness(),
            exterior_on: self.lighting.exterior_on(),
            exterior_override: self.lighting.manual_override(),
            intruder: inputs.intruder_on,
            alert_on: self.security.alert_on(),
            security: self.security.phase(),
            alarm: self.alarm.active(),
            tone_emitted: self.alarm.tones_emitted() > tones_before,
            access: self.access.state(),
            unlocked: self.access.is_unlocked(),
            battery_light: self.battery_light.color(),
            lcd: Default::default(),
        }
    }

    pub fn battery(&self) -> &BatteryModel {
        &self.battery
    }

    pub fn band(&self) -> PowerBand {
        self.battery.power_level()
    }

    pub fn alarm(&self) -> &AlarmSignaler<B::Buzzer> {
        &self.alarm
    }

    pub fn lighting(&self) -> &LightingController<B::Pwm, B::Output> {
        &self.lighting
    }

    pub fn security(&self) -> &SecurityMonitor<B::Output> {
        &self.security
    }

    pub fn access(&self) -> &AccessPanel<B::Keypad, B::Output> {
        &self.access
    }
}
