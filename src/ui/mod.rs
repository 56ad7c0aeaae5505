//! UI rendering module for skywatch
//!
//! This module contains all the rendering logic for the terminal user
//! interface, using the ratatui library for TUI components.

pub mod dashboard;
pub mod detail;
pub mod search;

pub use dashboard::render as render_dashboard;
pub use detail::render as render_detail;
pub use search::render as render_search;

use ratatui::style::Color;

use crate::data::UnitSystem;

/// Maps an OpenWeather icon code (e.g. "04d") to a display glyph
pub fn condition_glyph(icon: &str) -> &'static str {
    match icon.get(..2).unwrap_or("") {
        "01" => "\u{2600}",   // ☀ clear sky
        "02" => "\u{26c5}",   // ⛅ few clouds
        "03" | "04" => "\u{2601}", // ☁ clouds
        "09" => "\u{1f327}",  // 🌧 shower rain
        "10" => "\u{1f326}",  // 🌦 rain
        "11" => "\u{26c8}",   // ⛈ thunderstorm
        "13" => "\u{2744}",   // ❄ snow
        "50" => "\u{1f32b}",  // 🌫 mist
        _ => "\u{2601}",
    }
}

/// Color for a temperature (warmer = more red, cooler = more blue)
pub fn temperature_color(temperature: i32, units: UnitSystem) -> Color {
    let celsius = match units {
        UnitSystem::Celsius => f64::from(temperature),
        UnitSystem::Fahrenheit => (f64::from(temperature) - 32.0) * 5.0 / 9.0,
    };

    if celsius >= 30.0 {
        Color::Red
    } else if celsius >= 25.0 {
        Color::LightRed
    } else if celsius >= 20.0 {
        Color::Yellow
    } else if celsius >= 15.0 {
        Color::Green
    } else if celsius >= 10.0 {
        Color::Cyan
    } else {
        Color::Blue
    }
}
