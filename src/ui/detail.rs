//! Location detail screen rendering
//!
//! Renders the 7-day forecast table and the next-24h hourly strip for one
//! favorite location.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{DailyForecast, HourlyForecast};
use crate::ui::{condition_glyph, temperature_color};

/// Renders the detail view for the given location id
pub fn render(frame: &mut Frame, app: &App, location_id: &str) {
    let Some(location) = app.favorites.iter().find(|fav| fav.id == location_id) else {
        let missing = Paragraph::new("Location no longer in favorites - press Esc")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(missing, frame.area());
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let weather = app.weather_for(location_id);

    // Current summary
    let mut summary_lines = vec![Line::from(Span::styled(
        format!("{}, {}", location.name, location.country),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];
    if let Some(current) = weather.and_then(|entry| entry.current.as_ref()) {
        summary_lines.push(Line::from(vec![
            Span::styled(
                format!(
                    "{} {}{}",
                    condition_glyph(&current.icon),
                    current.temperature,
                    app.units.temperature_suffix()
                ),
                Style::default()
                    .fg(temperature_color(current.temperature, app.units))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  {}  ({}{} / {}{})",
                current.description,
                current.temp_min,
                app.units.temperature_suffix(),
                current.temp_max,
                app.units.temperature_suffix()
            )),
        ]));
        summary_lines.push(Line::from(Span::raw(format!(
            "humidity {}%  pressure {} hPa  wind {} {} at {}\u{b0}",
            current.humidity,
            current.pressure,
            current.wind_speed,
            app.units.wind_unit(),
            current.wind_deg
        ))));
    } else {
        summary_lines.push(Line::from(Span::styled(
            "No current data yet",
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(
        Paragraph::new(summary_lines).block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    render_hourly_strip(
        frame,
        app,
        weather.and_then(|entry| entry.hourly.as_deref()),
        chunks[1],
    );
    render_daily_table(
        frame,
        app,
        weather.and_then(|entry| entry.forecast.as_deref()),
        chunks[2],
    );

    let footer = Paragraph::new(Line::from(Span::styled(
        " Esc back  u units  r refresh  q quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(footer, chunks[3]);
}

/// Renders the next ~24 hours as one column per 3-hour step
fn render_hourly_strip(frame: &mut Frame, app: &App, hourly: Option<&[HourlyForecast]>, area: Rect) {
    let block = Block::default()
        .title(" Next 24 hours ")
        .borders(Borders::ALL);

    let Some(hours) = hourly.filter(|hours| !hours.is_empty()) else {
        frame.render_widget(
            Paragraph::new("No hourly data yet")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    };

    let mut labels = Vec::new();
    let mut temps = Vec::new();
    let mut pops = Vec::new();
    for hour in hours {
        labels.push(Span::raw(format!("{:>7}", hour.time_label)));
        temps.push(Span::styled(
            format!(
                "{:>7}",
                format!("{}{}", hour.temperature, app.units.temperature_suffix())
            ),
            Style::default().fg(temperature_color(hour.temperature, app.units)),
        ));
        pops.push(Span::styled(
            format!("{:>7}", format!("{}%", hour.precipitation_chance)),
            Style::default().fg(Color::Blue),
        ));
    }

    let lines = vec![Line::from(labels), Line::from(temps), Line::from(pops)];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders the folded daily forecast, one row per day
fn render_daily_table(frame: &mut Frame, app: &App, forecast: Option<&[DailyForecast]>, area: Rect) {
    let block = Block::default().title(" 7-day forecast ").borders(Borders::ALL);

    let Some(days) = forecast.filter(|days| !days.is_empty()) else {
        frame.render_widget(
            Paragraph::new("No forecast data yet")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    };

    let lines: Vec<Line> = days.iter().map(|day| daily_row(app, day)).collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Builds one forecast row: date, glyph, range, precipitation, wind
fn daily_row<'a>(app: &App, day: &'a DailyForecast) -> Line<'a> {
    Line::from(vec![
        Span::raw(format!("{:<12}", day.date.format("%a %b %-d").to_string())),
        Span::raw(format!("{}  ", condition_glyph(&day.icon))),
        Span::styled(
            format!("{:>4}", format!("{}\u{b0}", day.temp_min)),
            Style::default().fg(temperature_color(day.temp_min, app.units)),
        ),
        Span::raw(" / "),
        Span::styled(
            format!("{:<4}", format!("{}\u{b0}", day.temp_max)),
            Style::default().fg(temperature_color(day.temp_max, app.units)),
        ),
        Span::styled(
            format!("  {:>3}%", day.precipitation_chance),
            Style::default().fg(Color::Blue),
        ),
        Span::raw(format!(
            "  wind {} {}  {}",
            day.wind_speed,
            app.units.wind_unit(),
            day.description
        )),
    ])
}
