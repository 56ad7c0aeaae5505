//! Dashboard screen rendering
//!
//! Renders the main view: one card per favorite location with its current
//! conditions, loading indicator, or inline error.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, LocationWeather};
use crate::data::Location;
use crate::ui::{condition_glyph, temperature_color};

/// Height of one location card, borders included
const CARD_HEIGHT: u16 = 5;

/// Renders the dashboard view
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_cards(frame, app, chunks[1]);
    render_footer(frame, chunks[2]);
}

/// Renders the title bar with unit system and last refresh time
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " skywatch ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("[{}]", app.units.temperature_suffix())),
    ];

    if let Some(refreshed) = app.last_refresh {
        spans.push(Span::styled(
            format!("  updated {}", refreshed.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::BOTTOM));

    frame.render_widget(header, area);
}

/// Renders one card per favorite, top to bottom
fn render_cards(frame: &mut Frame, app: &App, area: Rect) {
    if app.favorites.is_empty() {
        let hint = Paragraph::new("No favorites yet - press / to search for a city")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(hint, area);
        return;
    }

    for (index, location) in app.favorites.iter().enumerate() {
        let y = area.y + (index as u16) * CARD_HEIGHT;
        if y + CARD_HEIGHT > area.y + area.height {
            break;
        }

        let card_area = Rect::new(area.x, y, area.width, CARD_HEIGHT);
        render_card(
            frame,
            app,
            location,
            index == app.selected_index,
            card_area,
        );
    }
}

/// Renders a single location card
fn render_card(frame: &mut Frame, app: &App, location: &Location, selected: bool, area: Rect) {
    let border_style = if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(format!(" {}, {} ", location.name, location.country))
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines = card_lines(app, app.weather_for(&location.id));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Builds the content lines of a card from its aggregation state
fn card_lines(app: &App, weather: Option<&LocationWeather>) -> Vec<Line<'static>> {
    let Some(entry) = weather else {
        return vec![Line::from(Span::styled(
            "Waiting for data...",
            Style::default().fg(Color::DarkGray),
        ))];
    };

    let mut lines = Vec::new();

    if let Some(ref current) = entry.current {
        lines.push(Line::from(vec![
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
            Span::raw(format!("  {}", current.description)),
        ]));
        lines.push(Line::from(Span::raw(format!(
            "feels like {}{}  humidity {}%  wind {} {}",
            current.feels_like,
            app.units.temperature_suffix(),
            current.humidity,
            current.wind_speed,
            app.units.wind_unit()
        ))));
    }

    if let Some(ref message) = entry.last_error {
        lines.push(Line::from(vec![
            Span::styled(
                format!("error: {}", message),
                Style::default().fg(Color::Red),
            ),
            Span::styled(
                "  (press d to remove)",
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    } else if entry.is_loading {
        lines.push(Line::from(Span::styled(
            "Fetching...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Waiting for data...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines
}

/// Renders the key hint footer
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " j/k move  Enter detail  / search  u units  d remove  r refresh  q quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(footer, area);
}
