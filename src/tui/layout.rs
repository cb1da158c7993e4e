//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, Paragraph};

use crate::devices::battery::PowerBand;
use crate::sim::display::COLUMNS;

use super::runtime::App;
use super::style;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // chart
            Constraint::Length(3), // battery gauge
            Constraint::Length(6), // display + status
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);
    render_battery_gauge(frame, app, chunks[2]);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(COLUMNS as u16 + 4), Constraint::Min(30)])
        .split(chunks[3]);
    render_lcd(frame, app, lower[0]);
    render_status(frame, app, lower[1]);

    render_footer(frame, chunks[4]);
}

/// Header bar: scenario name, tick progress, speed, run state.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (state_icon, state_label) = if app.is_finished() {
        ("■", "DONE")
    } else if app.paused {
        ("‖", "PAUSED")
    } else {
        ("▶", "RUNNING")
    };

    let header = Line::from(vec![
        Span::styled(
            " DWELLING ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            &app.preset_name,
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ t={}/{} │ {}ms │ {} {} ",
            app.tick,
            app.total_ticks,
            app.tick_interval_ms(),
            state_icon,
            state_label,
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Battery level and solar reading over the rolling history.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let battery_data: Vec<(f64, f64)> = app
        .history
        .iter()
        .map(|r| (f64::from(r.tick), r.battery_level))
        .collect();

    let solar_data: Vec<(f64, f64)> = app
        .history
        .iter()
        .map(|r| (f64::from(r.tick), r.solar_pct))
        .collect();

    let x_lo = battery_data.first().map_or(0.0, |p| p.0);
    let x_hi = battery_data.last().map_or(1.0, |p| p.0).max(x_lo + 1.0);

    let datasets = vec![
        Dataset::default()
            .name("Battery")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::BATTERY_COLOR))
            .data(&battery_data),
        Dataset::default()
            .name("Solar")
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(style::SOLAR_COLOR))
            .data(&solar_data),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Battery vs Solar ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("tick")
                .bounds([x_lo, x_hi])
                .labels(vec![format!("{}", x_lo as u32), format!("{}", x_hi as u32)]),
        )
        .y_axis(
            Axis::default()
                .title("%")
                .bounds([0.0, 100.0])
                .labels(vec!["0".to_string(), "100".to_string()]),
        );

    frame.render_widget(chart, area);
}

/// Battery gauge colored by band, with the charging flag alongside.
fn render_battery_gauge(frame: &mut Frame, app: &App, area: Rect) {
    let level = app.battery_level();
    let band = app
        .last_record()
        .map_or_else(|| PowerBand::from_level(level), |r| r.band);
    let charging = app.last_record().is_some_and(|r| r.charging);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(14)])
        .split(area);

    let gauge = Gauge::default()
        .block(Block::default().title(" Battery ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(style::band_color(band)))
        .ratio((level / 100.0).clamp(0.0, 1.0))
        .label(format!("{level:.1}% {band}"));
    frame.render_widget(gauge, chunks[0]);

    let (text, color) = if charging {
        ("CHARGING", style::SOLAR_COLOR)
    } else {
        ("", style::FOOTER_FG)
    };
    let flag = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(flag, chunks[1]);
}

/// The 16x2 character display as last rendered by the controller.
fn render_lcd(frame: &mut Frame, app: &App, area: Rect) {
    let blank = " ".repeat(COLUMNS);
    let rows = app
        .last_record()
        .map_or_else(|| [blank.clone(), blank.clone()], |r| r.lcd.clone());
    let lines: Vec<Line> = rows
        .into_iter()
        .map(|row| Line::from(Span::styled(row, Style::default().fg(style::LCD_FG))))
        .collect();
    let block = Block::default().title(" LCD ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn lamp(label: &str, on: bool, color: Color) -> Span<'static> {
    let fg = if on { color } else { style::OFF };
    Span::styled(
        format!(" {label} "),
        Style::default().fg(fg).add_modifier(Modifier::BOLD),
    )
}

/// Lights, security, alarm and access state of the latest tick.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let lines = if let Some(r) = app.last_record() {
        vec![
            Line::from(vec![
                lamp("interior", r.interior_on, Color::White),
                Span::raw(format!("{:>3} ", r.interior_brightness)),
                lamp("exterior", r.exterior_on, Color::White),
                lamp("alert", r.alert_on, style::ALERT),
                Span::styled(
                    " ● ",
                    Style::default().fg(style::light_color(r.battery_light)),
                ),
            ]),
            Line::from(format!(
                "  security={}  motion={}  override={}",
                r.security,
                if app.intruder_held() || r.intruder {
                    "on"
                } else {
                    "off"
                },
                r.exterior_override,
            )),
            Line::from(vec![
                Span::raw(format!("  alarm={}", r.alarm)),
                Span::styled(
                    if r.tone_emitted { "  ♪" } else { "" },
                    Style::default().fg(style::ALERT),
                ),
            ]),
            Line::from(format!(
                "  access={}  {}",
                r.access,
                if r.unlocked { "unlocked" } else { "locked" },
            )),
        ]
    } else {
        vec![Line::from("  Waiting for first tick...")]
    };

    let block = Block::default().title(" Status ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        concat!(
            " q:Quit  Space:Pause  +/-:Speed  F1-F4:Preset  r:Restart",
            "  i/e:Lights  m:Motion  0-9 A-D * #:Keypad",
        ),
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
