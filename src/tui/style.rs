//! Color constants for the TUI.

use ratatui::style::Color;

use crate::devices::battery::PowerBand;
use crate::devices::pin::LightColor;

/// Battery level line color.
pub const BATTERY_COLOR: Color = Color::Cyan;
/// Solar reading line color.
pub const SOLAR_COLOR: Color = Color::Yellow;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Character display foreground.
pub const LCD_FG: Color = Color::LightGreen;
/// Active alarm or intrusion color.
pub const ALERT: Color = Color::Magenta;
/// Indicator for an unlit output.
pub const OFF: Color = Color::DarkGray;

/// Gauge color for a power band.
pub fn band_color(band: PowerBand) -> Color {
    match band {
        PowerBand::Full | PowerBand::NearFull => Color::Green,
        PowerBand::Middle => Color::Yellow,
        PowerBand::Low => Color::LightRed,
        PowerBand::Critical => Color::Red,
    }
}

/// Terminal color for a two-color indicator.
pub fn light_color(color: Option<LightColor>) -> Color {
    match color {
        Some(LightColor::Red) => Color::Red,
        Some(LightColor::Green) => Color::Green,
        None => OFF,
    }
}
