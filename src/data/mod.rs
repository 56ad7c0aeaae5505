//! Core data models for skywatch
//!
//! This module contains the canonical shapes the rest of the application
//! consumes: favorite locations, normalized current conditions, and the
//! daily/hourly forecast summaries folded from the provider's 3-hour feed.

pub mod openweather;

#[allow(unused_imports)]
pub use openweather::{WeatherClient, WeatherError};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Measurement system used for display and for the upstream request token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Celsius,
    Fahrenheit,
}

impl UnitSystem {
    /// Token the provider expects in the `units` query parameter
    pub fn api_token(&self) -> &'static str {
        match self {
            UnitSystem::Celsius => "metric",
            UnitSystem::Fahrenheit => "imperial",
        }
    }

    /// Wind speed unit paired with this system
    pub fn wind_unit(&self) -> &'static str {
        match self {
            UnitSystem::Celsius => "m/s",
            UnitSystem::Fahrenheit => "mph",
        }
    }

    /// Temperature suffix for display
    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Celsius => "\u{b0}C",
            UnitSystem::Fahrenheit => "\u{b0}F",
        }
    }

    /// The other unit system
    pub fn toggled(&self) -> Self {
        match self {
            UnitSystem::Celsius => UnitSystem::Fahrenheit,
            UnitSystem::Fahrenheit => UnitSystem::Celsius,
        }
    }
}

impl Default for UnitSystem {
    fn default() -> Self {
        UnitSystem::Celsius
    }
}

/// A location the user follows, created from a search result
///
/// `id` is stable across searches: the lowercased name with whitespace runs
/// collapsed to single hyphens, joined with the lowercased country code
/// (e.g. "new-york-us"). Locations are immutable once created and unique
/// by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Stable identifier derived from name and country
    pub id: String,
    /// Human-readable place name
    pub name: String,
    /// ISO 3166 country code
    pub country: String,
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
}

/// A normalized snapshot of current conditions at a location
///
/// Temperature and wind fields are rounded to the nearest whole unit at
/// normalization time (half away from zero); the integer types carry that
/// contract. A snapshot is replaced wholesale on every successful fetch,
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// City name as reported by the provider
    pub city: String,
    /// ISO 3166 country code
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature: i32,
    pub feels_like: i32,
    pub temp_min: i32,
    pub temp_max: i32,
    /// Relative humidity percentage (0-100), passed through unrounded
    pub humidity: u8,
    /// Atmospheric pressure in hPa, passed through unrounded
    pub pressure: u32,
    pub wind_speed: i32,
    /// Wind direction in degrees (0-359), passed through unrounded
    pub wind_deg: u16,
    /// Condition text, e.g. "broken clouds"
    pub description: String,
    /// Provider icon code, e.g. "04d"
    pub icon: String,
    /// When the observation was taken
    pub observed_at: DateTime<Utc>,
}

/// One day of forecast, folded from the provider's 3-hour samples
///
/// The first sample seen for a date seeds every field; later samples for the
/// same date only widen the `temp_min`..`temp_max` range, so after the fold
/// `temp_min <= temp_max` always holds while the remaining fields keep the
/// first sample's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Calendar day in the viewer's local time zone
    pub date: NaiveDate,
    /// Temperature of the first sample of the day
    pub temperature: i32,
    pub temp_min: i32,
    pub temp_max: i32,
    pub humidity: u8,
    pub wind_speed: i32,
    pub description: String,
    pub icon: String,
    /// Probability of precipitation as an integer percentage (0-100)
    pub precipitation_chance: u8,
}

/// One 3-hour step of the near-term forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    /// 12-hour clock label in the viewer's local time zone, e.g. "5 PM"
    pub time_label: String,
    pub temperature: i32,
    pub humidity: u8,
    pub wind_speed: i32,
    pub description: String,
    pub icon: String,
    /// Probability of precipitation as an integer percentage (0-100)
    pub precipitation_chance: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_system_api_tokens() {
        assert_eq!(UnitSystem::Celsius.api_token(), "metric");
        assert_eq!(UnitSystem::Fahrenheit.api_token(), "imperial");
    }

    #[test]
    fn test_unit_system_wind_unit_pairing() {
        assert_eq!(UnitSystem::Celsius.wind_unit(), "m/s");
        assert_eq!(UnitSystem::Fahrenheit.wind_unit(), "mph");
    }

    #[test]
    fn test_unit_system_toggle_roundtrip() {
        assert_eq!(UnitSystem::Celsius.toggled(), UnitSystem::Fahrenheit);
        assert_eq!(UnitSystem::Celsius.toggled().toggled(), UnitSystem::Celsius);
    }

    #[test]
    fn test_unit_system_default_is_celsius() {
        assert_eq!(UnitSystem::default(), UnitSystem::Celsius);
    }

    #[test]
    fn test_unit_system_serializes_lowercase() {
        let json = serde_json::to_string(&UnitSystem::Fahrenheit).expect("serialize");
        assert_eq!(json, "\"fahrenheit\"");

        let parsed: UnitSystem = serde_json::from_str("\"celsius\"").expect("deserialize");
        assert_eq!(parsed, UnitSystem::Celsius);
    }

    #[test]
    fn test_location_serialization_roundtrip() {
        let location = Location {
            id: "london-gb".to_string(),
            name: "London".to_string(),
            country: "GB".to_string(),
            latitude: 51.5073,
            longitude: -0.1277,
        };

        let json = serde_json::to_string(&location).expect("Failed to serialize Location");
        let deserialized: Location =
            serde_json::from_str(&json).expect("Failed to deserialize Location");

        assert_eq!(deserialized, location);
    }

    #[test]
    fn test_current_conditions_serialization_roundtrip() {
        let conditions = CurrentConditions {
            city: "London".to_string(),
            country: "GB".to_string(),
            latitude: 51.5085,
            longitude: -0.1257,
            temperature: 16,
            feels_like: 15,
            temp_min: 14,
            temp_max: 17,
            humidity: 72,
            pressure: 1012,
            wind_speed: 5,
            wind_deg: 240,
            description: "broken clouds".to_string(),
            icon: "04d".to_string(),
            observed_at: Utc::now(),
        };

        let json = serde_json::to_string(&conditions).expect("Failed to serialize");
        let deserialized: CurrentConditions =
            serde_json::from_str(&json).expect("Failed to deserialize");

        assert_eq!(deserialized, conditions);
    }

    #[test]
    fn test_daily_forecast_range_invariant_holds_in_sample() {
        let day = DailyForecast {
            date: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
            temperature: 22,
            temp_min: 18,
            temp_max: 25,
            humidity: 60,
            wind_speed: 4,
            description: "scattered clouds".to_string(),
            icon: "03d".to_string(),
            precipitation_chance: 20,
        };

        assert!(day.temp_min <= day.temp_max);
    }
}
