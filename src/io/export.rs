//! CSV export for tick records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::devices::battery::PowerBand;
use crate::devices::buzzer::AlarmSignal;
use crate::devices::pin::LightColor;
use crate::sim::security::SecurityPhase;
use crate::sim::types::TickRecord;

/// One CSV row. Field order is the column order.
#[derive(Debug, Serialize)]
struct TelemetryRow<'a> {
    tick: u32,
    seconds: f64,
    battery_level: f64,
    charging: bool,
    band: PowerBand,
    solar_pct: f64,
    interior_on: bool,
    interior_brightness: u8,
    exterior_on: bool,
    exterior_override: bool,
    intruder: bool,
    alert_on: bool,
    security: SecurityPhase,
    alarm: AlarmSignal,
    tone_emitted: bool,
    access: String,
    unlocked: bool,
    battery_light: &'static str,
    lcd_row0: &'a str,
    lcd_row1: &'a str,
}

impl<'a> From<&'a TickRecord> for TelemetryRow<'a> {
    fn from(r: &'a TickRecord) -> Self {
        Self {
            tick: r.tick,
            seconds: r.seconds,
            battery_level: round4(r.battery_level),
            charging: r.charging,
            band: r.band,
            solar_pct: round4(r.solar_pct),
            interior_on: r.interior_on,
            interior_brightness: r.interior_brightness,
            exterior_on: r.exterior_on,
            exterior_override: r.exterior_override,
            intruder: r.intruder,
            alert_on: r.alert_on,
            security: r.security,
            alarm: r.alarm,
            tone_emitted: r.tone_emitted,
            access: r.access.to_string(),
            unlocked: r.unlocked,
            battery_light: match r.battery_light {
                Some(LightColor::Red) => "red",
                Some(LightColor::Green) => "green",
                None => "off",
            },
            lcd_row0: &r.lcd[0],
            lcd_row1: &r.lcd[1],
        }
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Exports tick records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per tick. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `records` - Complete tick records
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[TickRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes tick records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[TickRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    for r in records {
        wtr.serialize(TelemetryRow::from(r))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::access::AccessState;

    fn make_record(tick: u32) -> TickRecord {
        TickRecord {
            tick,
            seconds: TickRecord::seconds_at(tick),
            battery_level: 33.333_333,
            charging: true,
            band: PowerBand::Middle,
            solar_pct: 12.5,
            interior_on: true,
            interior_brightness: 255,
            exterior_on: false,
            exterior_override: false,
            intruder: false,
            alert_on: false,
            security: SecurityPhase::Idle,
            alarm: AlarmSignal::Low,
            tone_emitted: false,
            access: AccessState::Entering { entered: 2 },
            unlocked: false,
            battery_light: Some(LightColor::Green),
            lcd: ["Input PIN:**    ".to_string(), " ".repeat(16)],
        }
    }

    #[test]
    fn header_lists_every_column() {
        let mut buf = Vec::new();
        write_csv(&[make_record(0)], &mut buf).ok();
        let output = String::from_utf8(buf).unwrap_or_default();
        let first_line = output.lines().next().unwrap_or("");
        assert_eq!(
            first_line,
            "tick,seconds,battery_level,charging,band,solar_pct,interior_on,\
             interior_brightness,exterior_on,exterior_override,intruder,alert_on,\
             security,alarm,tone_emitted,access,unlocked,battery_light,lcd_row0,lcd_row1"
        );
    }

    #[test]
    fn enums_are_written_as_labels() {
        let mut buf = Vec::new();
        write_csv(&[make_record(7)], &mut buf).ok();
        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let rec = rdr.records().next().and_then(Result::ok);
        assert!(rec.is_some(), "data row should parse");
        let rec = rec.unwrap_or_default();
        assert_eq!(&rec[0], "7");
        assert_eq!(&rec[2], "33.3333");
        assert_eq!(&rec[4], "middle");
        assert_eq!(&rec[12], "idle");
        assert_eq!(&rec[13], "low");
        assert_eq!(&rec[15], "entering(2)");
        assert_eq!(&rec[17], "green");
        assert_eq!(&rec[18], "Input PIN:**    ");
    }

    #[test]
    fn row_count_matches_tick_count() {
        let records: Vec<TickRecord> = (0..24).map(make_record).collect();
        let mut buf = Vec::new();
        write_csv(&records, &mut buf).ok();
        let output = String::from_utf8(buf).unwrap_or_default();
        assert_eq!(output.lines().count(), 25);
    }

    #[test]
    fn deterministic_output() {
        let records: Vec<TickRecord> = (0..5).map(make_record).collect();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_csv(&records, &mut buf1).ok();
        write_csv(&records, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }
}
