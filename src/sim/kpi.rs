//! Post-hoc run summary computed from tick records.

use std::collections::BTreeMap;
use std::fmt;

use crate::devices::battery::PowerBand;
use crate::sim::access::AccessState;

use super::types::TickRecord;

/// Aggregate figures for a complete run.
///
/// Computed from `&[TickRecord]` so the summary always agrees with the
/// exported telemetry.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub ticks: usize,
    pub final_battery: f64,
    pub min_battery: f64,
    pub max_battery: f64,
    /// Ticks spent in each power band (every band present, possibly zero).
    pub band_ticks: BTreeMap<PowerBand, usize>,
    /// Alarm tones started.
    pub tones_emitted: usize,
    /// Ticks with the intrusion sensor on.
    pub intrusion_ticks: usize,
    /// First tick the access code was accepted.
    pub unlocked_at: Option<u32>,
    /// Lockouts entered.
    pub lockouts: usize,
}

impl RunReport {
    /// Computes the summary from the complete record vector.
    pub fn from_records(records: &[TickRecord]) -> Self {
        let mut band_ticks: BTreeMap<PowerBand, usize> =
            PowerBand::ALL.iter().map(|&b| (b, 0)).collect();
        let mut min_battery = f64::INFINITY;
        let mut max_battery = f64::NEG_INFINITY;
        let mut tones_emitted = 0;
        let mut intrusion_ticks = 0;
        let mut unlocked_at = None;
        let mut lockouts = 0;
        let mut was_locked_out = false;

        for r in records {
            *band_ticks.entry(r.band).or_default() += 1;
            min_battery = min_battery.min(r.battery_level);
            max_battery = max_battery.max(r.battery_level);
            if r.tone_emitted {
                tones_emitted += 1;
            }
            if r.intruder {
                intrusion_ticks += 1;
            }
            if r.unlocked && unlocked_at.is_none() {
                unlocked_at = Some(r.tick);
            }
            let locked_out = matches!(r.access, AccessState::LockedOut { .. });
            if locked_out && !was_locked_out {
                lockouts += 1;
            }
            was_locked_out = locked_out;
        }

        if records.is_empty() {
            min_battery = 0.0;
            max_battery = 0.0;
        }

        Self {
            ticks: records.len(),
            final_battery: records.last().map_or(0.0, |r| r.battery_level),
            min_battery,
            max_battery,
            band_ticks,
            tones_emitted,
            intrusion_ticks,
            unlocked_at,
            lockouts,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Run Report ---")?;
        writeln!(f, "Ticks:                 {}", self.ticks)?;
        writeln!(
            f,
            "Battery:               {:.1}% final ({:.1}% min, {:.1}% max)",
            self.final_battery, self.min_battery, self.max_battery
        )?;
        for (band, count) in &self.band_ticks {
            writeln!(f, "  {:<20} {count} ticks", format!("{band}:"))?;
        }
        writeln!(f, "Alarm tones:           {}", self.tones_emitted)?;
        writeln!(f, "Intrusion ticks:       {}", self.intrusion_ticks)?;
        match self.unlocked_at {
            Some(t) => writeln!(f, "Unlocked at tick:      {t}")?,
            None => writeln!(f, "Unlocked at tick:      never")?,
        }
        write!(f, "Lockouts:              {}", self.lockouts)
    }
}
