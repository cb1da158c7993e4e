use std::fmt;

use serde::Serialize;

/// Battery ceiling; charging stops exactly here.
pub const MAX_LEVEL: f64 = 100.0;
/// Charging re-engages only below this level.
pub const CHARGING_THRESHOLD: f64 = 90.0;
/// Lower bound of the near-full band.
pub const NEAR_FULL_THRESHOLD: f64 = 80.0;
/// Lower bound of the middle band.
pub const LOW_THRESHOLD: f64 = 25.0;
/// Lower bound of the low band.
pub const CRITICAL_THRESHOLD: f64 = 10.0;
/// Divisor applied to the solar input on every charge cycle.
pub const SOLAR_ATTENUATION: f64 = 50.0;

/// Discrete battery-charge category derived from the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerBand {
    /// Below 10.
    Critical,
    /// 10 up to 25.
    Low,
    /// 25 up to 80.
    Middle,
    /// 80 up to 90.
    NearFull,
    /// 90 and above.
    Full,
}

impl PowerBand {
    /// All bands, lowest first.
    pub const ALL: [PowerBand; 5] = [
        Self::Critical,
        Self::Low,
        Self::Middle,
        Self::NearFull,
        Self::Full,
    ];

    /// Classifies a battery level. Each band is closed below and open above,
    /// so a level sitting exactly on a breakpoint belongs to the upper band.
    pub fn from_level(level: f64) -> Self {
        if level < CRITICAL_THRESHOLD {
            Self::Critical
        } else if level < LOW_THRESHOLD {
            Self::Low
        } else if level < NEAR_FULL_THRESHOLD {
            Self::Middle
        } else if level < CHARGING_THRESHOLD {
            Self::NearFull
        } else {
            Self::Full
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Low => "low",
            Self::Middle => "middle",
            Self::NearFull => "near_full",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for PowerBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Solar-charged house battery with charge hysteresis.
///
/// The level is a percentage kept within `[0, 100]`. Charging engages only
/// when the battery is not already charging and sits below 90, then runs
/// until the level reaches exactly 100. Between 90 and 100 a discharged
/// battery therefore does not restart charging, which keeps the charging
/// flag from chattering near the ceiling.
///
/// # Examples
///
/// ```
/// use dwelling_sim::devices::battery::{BatteryModel, PowerBand};
///
/// let mut battery = BatteryModel::new(0.0);
/// for _ in 0..100 {
///     battery.charge_battery(50.0);
/// }
/// assert_eq!(battery.level(), 100.0);
/// assert!(!battery.is_charging());
/// assert_eq!(battery.power_level(), PowerBand::Full);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatteryModel {
    level: f64,
    charging: bool,
}

impl BatteryModel {
    /// Creates a battery at `level`, clamped to `[0, 100]`, not charging.
    pub fn new(level: f64) -> Self {
        Self {
            level: level.clamp(0.0, MAX_LEVEL),
            charging: false,
        }
    }

    /// Runs one charge cycle from a solar reading (percent light).
    ///
    /// While charging, the level grows by `solar_input / 50`. Charging turns
    /// off in the cycle the level reaches 100.
    pub fn charge_battery(&mut self, solar_input: f64) {
        if !self.charging && self.level < CHARGING_THRESHOLD {
            self.charging = true;
        }

        if self.charging {
            self.level = (self.level + solar_input / SOLAR_ATTENUATION).clamp(0.0, MAX_LEVEL);
            if self.level == MAX_LEVEL {
                self.charging = false;
            }
        }
    }

    /// Draws `amount` from the battery.
    ///
    /// Negative amounts are not rejected and act as an injection; the result
    /// is still clamped to `[0, 100]`.
    pub fn use_power(&mut self, amount: f64) {
        self.level = (self.level - amount).clamp(0.0, MAX_LEVEL);
    }

    /// Current charge band.
    pub fn power_level(&self) -> PowerBand {
        PowerBand::from_level(self.level)
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_breakpoints_resolve_upward() {
        assert_eq!(PowerBand::from_level(0.0), PowerBand::Critical);
        assert_eq!(PowerBand::from_level(9.999), PowerBand::Critical);
        assert_eq!(PowerBand::from_level(10.0), PowerBand::Low);
        assert_eq!(PowerBand::from_level(24.999), PowerBand::Low);
        assert_eq!(PowerBand::from_level(25.0), PowerBand::Middle);
        assert_eq!(PowerBand::from_level(79.999), PowerBand::Middle);
        assert_eq!(PowerBand::from_level(80.0), PowerBand::NearFull);
        assert_eq!(PowerBand::from_level(89.999), PowerBand::NearFull);
        assert_eq!(PowerBand::from_level(90.0), PowerBand::Full);
        assert_eq!(PowerBand::from_level(100.0), PowerBand::Full);
    }

    #[test]
    fn bands_are_monotonic_in_level() {
        let mut previous = PowerBand::Critical;
        for tenth in 0..=1000 {
            let band = PowerBand::from_level(f64::from(tenth) / 10.0);
            assert!(band >= previous);
            previous = band;
        }
    }

    #[test]
    fn new_clamps_initial_level() {
        assert_eq!(BatteryModel::new(-5.0).level(), 0.0);
        assert_eq!(BatteryModel::new(140.0).level(), 100.0);
        assert!(!BatteryModel::new(50.0).is_charging());
    }

    #[test]
    fn charge_uses_fixed_attenuation() {
        let mut battery = BatteryModel::new(20.0);
        battery.charge_battery(75.0);
        assert!(battery.is_charging());
        assert!((battery.level() - 21.5).abs() < 1e-12);
    }

    #[test]
    fn charging_stops_at_ceiling_without_overshoot() {
        let mut battery = BatteryModel::new(99.5);
        battery.charging = true;
        battery.charge_battery(100.0);
        assert_eq!(battery.level(), 100.0);
        assert!(!battery.is_charging());
    }

    #[test]
    fn charging_does_not_reengage_between_90_and_100() {
        let mut battery = BatteryModel::new(0.0);
        while battery.level() < MAX_LEVEL {
            battery.charge_battery(50.0);
        }
        assert!(!battery.is_charging());

        battery.use_power(5.0);
        battery.charge_battery(50.0);
        assert!(!battery.is_charging());
        assert_eq!(battery.level(), 95.0);

        battery.use_power(5.5);
        battery.charge_battery(50.0);
        assert!(battery.is_charging());
        assert!((battery.level() - 90.5).abs() < 1e-12);
    }

    #[test]
    fn use_power_never_goes_negative() {
        let mut battery = BatteryModel::new(2.0);
        battery.use_power(3.0);
        assert_eq!(battery.level(), 0.0);
    }

    #[test]
    fn negative_draw_injects_but_stays_bounded() {
        let mut battery = BatteryModel::new(50.0);
        battery.use_power(-10.0);
        assert_eq!(battery.level(), 60.0);
        battery.use_power(-1_000.0);
        assert_eq!(battery.level(), 100.0);
    }

    #[test]
    fn level_stays_bounded_for_any_inputs() {
        let inputs = [-1e9, -250.0, -1.0, 0.0, 0.5, 3.0, 100.0, 1e9];
        for &solar in &inputs {
            for &draw in &inputs {
                let mut battery = BatteryModel::new(45.0);
                for _ in 0..5 {
                    battery.charge_battery(solar);
                    battery.use_power(draw);
                    assert!((0.0..=MAX_LEVEL).contains(&battery.level()));
                }
            }
        }
    }

    #[test]
    fn low_level_is_critical() {
        let battery = BatteryModel::new(5.0);
        assert_eq!(battery.power_level(), PowerBand::Critical);
    }
}
