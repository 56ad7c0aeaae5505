//! Search overlay rendering
//!
//! Renders a centered modal overlay with the query input and the result
//! list returned by the location search.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

/// Renders the search overlay on top of the current view
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let overlay_area = centered_rect(60, 14, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Search: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(app.search_input.clone()),
            Span::styled("_", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
    ];

    if let Some(ref message) = app.search_error {
        lines.push(Line::from(Span::styled(
            format!("error: {}", message),
            Style::default().fg(Color::Red),
        )));
    } else if app.search_results.is_empty() {
        let hint = if app.search_input.trim().chars().count() < 2 {
            "Type at least 2 characters"
        } else {
            "No matches"
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for (index, location) in app.search_results.iter().enumerate() {
            let label = format!(
                "{}, {}  ({:.2}, {:.2})",
                location.name, location.country, location.latitude, location.longitude
            );
            let style = if index == app.search_selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(label, style)));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter add  \u{2191}/\u{2193} select  Esc close",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .title(" Add a city ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

/// Computes a centered rectangle of fixed width/height inside `area`
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}
