//! OpenWeatherMap API client
//!
//! This module fetches current observations, forecasts, and location search
//! results from OpenWeatherMap and normalizes them into our data structures.
//! Each retrieval consults an in-memory cache first so repeated requests for
//! the same (kind, coordinates, unit system) tuple inside the cache window
//! cost no transport call.

use chrono::{DateTime, Local, NaiveDate, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::cache::TtlCache;
use crate::data::{CurrentConditions, DailyForecast, HourlyForecast, Location, UnitSystem};

/// Base URL for the observation and forecast endpoints
const DATA_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// URL of the location search (geocoding) endpoint
const GEO_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";

/// Maximum number of folded days returned by the daily forecast
const FORECAST_DAY_LIMIT: usize = 7;

/// Number of leading 3-hour samples returned by the hourly forecast
const HOURLY_ENTRY_LIMIT: usize = 8;

/// Result cap requested from the search endpoint
const SEARCH_RESULT_LIMIT: u32 = 5;

/// Minimum trimmed query length before a search call is issued
const MIN_QUERY_CHARS: usize = 2;

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed or returned a non-success status
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// Timestamp in the response is out of representable range
    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),
}

/// Client for fetching weather data from OpenWeatherMap
///
/// Owns one response cache per request kind; all three share the standard
/// 60-second window and the `kind|lat|lon|units` key format. A transport or
/// normalization failure never populates the cache.
#[derive(Debug)]
pub struct WeatherClient {
    http: Client,
    api_key: String,
    data_url: String,
    geo_url: String,
    current_cache: TtlCache<CurrentConditions>,
    daily_cache: TtlCache<Vec<DailyForecast>>,
    hourly_cache: TtlCache<Vec<HourlyForecast>>,
}

impl WeatherClient {
    /// Creates a new WeatherClient with the given API credential
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            data_url: DATA_BASE_URL.to_string(),
            geo_url: GEO_URL.to_string(),
            current_cache: TtlCache::new(),
            daily_cache: TtlCache::new(),
            hourly_cache: TtlCache::new(),
        }
    }

    /// Points the client at custom endpoints (used by tests with a mock server)
    #[allow(dead_code)]
    pub fn with_endpoints(mut self, data_url: impl Into<String>, geo_url: impl Into<String>) -> Self {
        self.data_url = data_url.into();
        self.geo_url = geo_url.into();
        self
    }

    /// Fetches the current observation for the given coordinates
    ///
    /// Returns the cached snapshot when one is fresh; otherwise calls the
    /// provider, normalizes, stores the result, and returns it.
    pub async fn fetch_current(
        &self,
        lat: f64,
        lon: f64,
        units: UnitSystem,
    ) -> Result<CurrentConditions, WeatherError> {
        let key = cache_key("current", lat, lon, units);
        if let Some(hit) = self.current_cache.get(&key) {
            return Ok(hit);
        }

        let url = format!("{}/weather", self.data_url);
        let payload: CurrentResponse = self.get_observation(&url, lat, lon, units).await?;
        let conditions = current_from_payload(payload)?;

        self.current_cache.set(&key, conditions.clone());
        Ok(conditions)
    }

    /// Fetches the forecast and folds it into at most 7 daily summaries
    pub async fn fetch_daily_forecast(
        &self,
        lat: f64,
        lon: f64,
        units: UnitSystem,
    ) -> Result<Vec<DailyForecast>, WeatherError> {
        let key = cache_key("daily", lat, lon, units);
        if let Some(hit) = self.daily_cache.get(&key) {
            return Ok(hit);
        }

        let url = format!("{}/forecast", self.data_url);
        let payload: ForecastResponse = self.get_observation(&url, lat, lon, units).await?;
        let days = daily_from_payload(payload)?;

        self.daily_cache.set(&key, days.clone());
        Ok(days)
    }

    /// Fetches the forecast and maps its first 8 samples (the next ~24 hours)
    pub async fn fetch_hourly_forecast(
        &self,
        lat: f64,
        lon: f64,
        units: UnitSystem,
    ) -> Result<Vec<HourlyForecast>, WeatherError> {
        let key = cache_key("hourly", lat, lon, units);
        if let Some(hit) = self.hourly_cache.get(&key) {
            return Ok(hit);
        }

        let url = format!("{}/forecast", self.data_url);
        let payload: ForecastResponse = self.get_observation(&url, lat, lon, units).await?;
        let hours = hourly_from_payload(payload)?;

        self.hourly_cache.set(&key, hours.clone());
        Ok(hours)
    }

    /// Searches locations by free-text name
    ///
    /// Never cached. Queries shorter than 2 characters after trimming
    /// short-circuit to an empty list without touching the network, so
    /// keystroke-driven callers don't spam the provider. Callers should
    /// additionally debounce input (300 ms of quiescence works well).
    pub async fn search_locations(&self, query: &str) -> Result<Vec<Location>, WeatherError> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let response = self
            .http
            .get(&self.geo_url)
            .query(&[
                ("q", trimmed.to_string()),
                ("limit", SEARCH_RESULT_LIMIT.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let entries: Vec<GeoEntry> = serde_json::from_str(&body)?;

        Ok(locations_from_payload(entries))
    }

    /// Issues a coordinate-based GET and parses the JSON body
    async fn get_observation<T: DeserializeOwned>(
        &self,
        url: &str,
        lat: f64,
        lon: f64,
        units: UnitSystem,
    ) -> Result<T, WeatherError> {
        let response = self
            .http
            .get(url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", units.api_token().to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Composite cache key covering request kind, coordinates, and unit system
fn cache_key(kind: &str, lat: f64, lon: f64, units: UnitSystem) -> String {
    format!("{}|{}|{}|{}", kind, lat, lon, units.api_token())
}

/// Rounds to the nearest whole unit, halves away from zero
fn round_whole(value: f64) -> i32 {
    value.round() as i32
}

/// Converts a 0.0-1.0 precipitation probability to an integer percentage
fn percent_from_fraction(fraction: f64) -> u8 {
    (fraction * 100.0).round() as u8
}

/// First entry of the provider's conditions list; an empty list is malformed
fn primary_condition(list: &[ConditionEntry]) -> Result<&ConditionEntry, WeatherError> {
    list.first()
        .ok_or_else(|| WeatherError::MissingField("weather".to_string()))
}

/// Converts epoch seconds to a UTC instant
fn observation_instant(epoch_secs: i64) -> Result<DateTime<Utc>, WeatherError> {
    DateTime::from_timestamp(epoch_secs, 0).ok_or(WeatherError::InvalidTimestamp(epoch_secs))
}

/// Calendar day of an epoch-seconds timestamp in the viewer's local zone
fn local_date(epoch_secs: i64) -> Result<NaiveDate, WeatherError> {
    Ok(observation_instant(epoch_secs)?
        .with_timezone(&Local)
        .date_naive())
}

/// 12-hour clock label of an epoch-seconds timestamp, e.g. "5 PM"
fn clock_label(epoch_secs: i64) -> Result<String, WeatherError> {
    Ok(observation_instant(epoch_secs)?
        .with_timezone(&Local)
        .format("%-I %p")
        .to_string())
}

/// Normalizes a raw current-observation payload into a snapshot
///
/// Temperature and wind speed are rounded to whole units; humidity,
/// pressure, and wind direction pass through untouched.
fn current_from_payload(payload: CurrentResponse) -> Result<CurrentConditions, WeatherError> {
    let condition = primary_condition(&payload.weather)?;

    Ok(CurrentConditions {
        city: payload.name,
        country: payload.sys.country,
        latitude: payload.coord.lat,
        longitude: payload.coord.lon,
        temperature: round_whole(payload.main.temp),
        feels_like: round_whole(payload.main.feels_like),
        temp_min: round_whole(payload.main.temp_min),
        temp_max: round_whole(payload.main.temp_max),
        humidity: payload.main.humidity,
        pressure: payload.main.pressure,
        wind_speed: round_whole(payload.wind.speed),
        wind_deg: payload.wind.deg,
        description: condition.description.clone(),
        icon: condition.icon.clone(),
        observed_at: observation_instant(payload.dt)?,
    })
}

/// Folds 3-hour forecast samples into daily summaries
///
/// Samples are grouped by their viewer-local calendar date. The first sample
/// of a date seeds the summary; later same-date samples only tighten the
/// min/max range. Dates keep the order they first appear in the feed, and
/// the result is truncated to 7 days after the fold.
fn daily_from_payload(payload: ForecastResponse) -> Result<Vec<DailyForecast>, WeatherError> {
    let mut days: Vec<DailyForecast> = Vec::new();

    for sample in &payload.list {
        let date = local_date(sample.dt)?;

        match days.iter_mut().find(|day| day.date == date) {
            Some(day) => {
                day.temp_min = day.temp_min.min(round_whole(sample.main.temp_min));
                day.temp_max = day.temp_max.max(round_whole(sample.main.temp_max));
            }
            None => {
                let condition = primary_condition(&sample.weather)?;
                days.push(DailyForecast {
                    date,
                    temperature: round_whole(sample.main.temp),
                    temp_min: round_whole(sample.main.temp_min),
                    temp_max: round_whole(sample.main.temp_max),
                    humidity: sample.main.humidity,
                    wind_speed: round_whole(sample.wind.speed),
                    description: condition.description.clone(),
                    icon: condition.icon.clone(),
                    precipitation_chance: percent_from_fraction(sample.pop),
                });
            }
        }
    }

    days.truncate(FORECAST_DAY_LIMIT);
    Ok(days)
}

/// Maps the first 8 forecast samples 1:1 into hourly entries, in feed order
fn hourly_from_payload(payload: ForecastResponse) -> Result<Vec<HourlyForecast>, WeatherError> {
    payload
        .list
        .iter()
        .take(HOURLY_ENTRY_LIMIT)
        .map(|sample| {
            let condition = primary_condition(&sample.weather)?;
            Ok(HourlyForecast {
                time_label: clock_label(sample.dt)?,
                temperature: round_whole(sample.main.temp),
                humidity: sample.main.humidity,
                wind_speed: round_whole(sample.wind.speed),
                description: condition.description.clone(),
                icon: condition.icon.clone(),
                precipitation_chance: percent_from_fraction(sample.pop),
            })
        })
        .collect()
}

/// Turns geocoding entries into locations with stable derived ids
fn locations_from_payload(entries: Vec<GeoEntry>) -> Vec<Location> {
    entries
        .into_iter()
        .map(|entry| {
            let id = location_id(&entry.name, &entry.country);
            Location {
                id,
                name: entry.name,
                country: entry.country,
                latitude: entry.lat,
                longitude: entry.lon,
            }
        })
        .collect()
}

/// Stable location id: lowercased name with whitespace runs collapsed to
/// hyphens, joined with the lowercased country code
fn location_id(name: &str, country: &str) -> String {
    let slug = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("{}-{}", slug, country.to_lowercase())
}

/// Current-observation response structure
#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    dt: i64,
    coord: Coord,
    sys: SysInfo,
    main: MainReadings,
    wind: WindReadings,
    weather: Vec<ConditionEntry>,
}

#[derive(Debug, Deserialize)]
struct Coord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct SysInfo {
    country: String,
}

/// Shared temperature/humidity/pressure block of observations and samples
#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct WindReadings {
    speed: f64,
    deg: u16,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    description: String,
    icon: String,
}

/// 3-hour-step forecast response structure
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: MainReadings,
    wind: WindReadings,
    weather: Vec<ConditionEntry>,
    /// Precipitation probability as a 0.0-1.0 fraction
    pop: f64,
}

/// Geocoding search result entry
#[derive(Debug, Deserialize)]
struct GeoEntry {
    name: String,
    country: String,
    lat: f64,
    lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Sample valid current-observation response
    const CURRENT_RESPONSE: &str = r#"{
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [
            {"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}
        ],
        "base": "stations",
        "main": {
            "temp": 15.6,
            "feels_like": 15.2,
            "temp_min": 13.9,
            "temp_max": 17.2,
            "pressure": 1012,
            "humidity": 72
        },
        "visibility": 10000,
        "wind": {"speed": 4.6, "deg": 240},
        "clouds": {"all": 75},
        "dt": 1722945600,
        "sys": {"type": 2, "id": 2075535, "country": "GB", "sunrise": 1722918000, "sunset": 1722971000},
        "timezone": 3600,
        "id": 2643743,
        "name": "London",
        "cod": 200
    }"#;

    /// Epoch seconds for a given local wall-clock time
    ///
    /// Building timestamps from local components keeps date-grouping tests
    /// deterministic in whatever zone the test runner uses.
    fn local_ts(year: i32, month: u32, day: u32, hour: u32) -> i64 {
        Local
            .with_ymd_and_hms(year, month, day, hour, 0, 0)
            .unwrap()
            .timestamp()
    }

    /// Builds a forecast sample with the given timestamp and readings
    fn sample(dt: i64, temp: f64, temp_min: f64, temp_max: f64, description: &str, pop: f64) -> ForecastEntry {
        ForecastEntry {
            dt,
            main: MainReadings {
                temp,
                feels_like: temp,
                temp_min,
                temp_max,
                humidity: 60,
                pressure: 1010,
            },
            wind: WindReadings { speed: 3.4, deg: 180 },
            weather: vec![ConditionEntry {
                description: description.to_string(),
                icon: "03d".to_string(),
            }],
            pop,
        }
    }

    #[test]
    fn test_round_whole_is_half_away_from_zero() {
        assert_eq!(round_whole(15.6), 16);
        assert_eq!(round_whole(15.4), 15);
        assert_eq!(round_whole(15.5), 16);
        assert_eq!(round_whole(-2.5), -3);
        assert_eq!(round_whole(-2.4), -2);
    }

    #[test]
    fn test_percent_from_fraction_rounds() {
        assert_eq!(percent_from_fraction(0.0), 0);
        assert_eq!(percent_from_fraction(0.345), 35);
        assert_eq!(percent_from_fraction(0.344), 34);
        assert_eq!(percent_from_fraction(1.0), 100);
    }

    #[test]
    fn test_location_id_derivation() {
        assert_eq!(location_id("London", "GB"), "london-gb");
        assert_eq!(location_id("New York", "US"), "new-york-us");
        assert_eq!(location_id("  Los   Angeles ", "US"), "los-angeles-us");
    }

    #[test]
    fn test_current_from_payload_extracts_and_rounds() {
        let payload: CurrentResponse =
            serde_json::from_str(CURRENT_RESPONSE).expect("Failed to parse current response");

        let conditions = current_from_payload(payload).expect("Failed to normalize");

        assert_eq!(conditions.city, "London");
        assert_eq!(conditions.country, "GB");
        assert!((conditions.latitude - 51.5085).abs() < 0.0001);
        assert!((conditions.longitude - (-0.1257)).abs() < 0.0001);
        // 15.6 rounds half away from zero to 16
        assert_eq!(conditions.temperature, 16);
        assert_eq!(conditions.feels_like, 15);
        assert_eq!(conditions.temp_min, 14);
        assert_eq!(conditions.temp_max, 17);
        assert_eq!(conditions.wind_speed, 5);
        // Humidity, pressure, and wind direction pass through unrounded
        assert_eq!(conditions.humidity, 72);
        assert_eq!(conditions.pressure, 1012);
        assert_eq!(conditions.wind_deg, 240);
        assert_eq!(conditions.description, "broken clouds");
        assert_eq!(conditions.icon, "04d");
        assert_eq!(conditions.observed_at.timestamp(), 1722945600);
    }

    #[test]
    fn test_current_with_empty_conditions_list_is_structural_error() {
        let mut payload: CurrentResponse =
            serde_json::from_str(CURRENT_RESPONSE).expect("Failed to parse current response");
        payload.weather.clear();

        let result = current_from_payload(payload);

        match result {
            Err(WeatherError::MissingField(field)) => assert_eq!(field, "weather"),
            other => panic!("Expected MissingField error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_malformed_json() {
        let malformed = "{ invalid json }";
        let result: Result<CurrentResponse, _> = serde_json::from_str(malformed);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_missing_main_block() {
        let missing_main = r#"{
            "coord": {"lon": -0.1257, "lat": 51.5085},
            "weather": [{"description": "clear sky", "icon": "01d"}],
            "wind": {"speed": 4.6, "deg": 240},
            "dt": 1722945600,
            "sys": {"country": "GB"},
            "name": "London"
        }"#;

        let result: Result<CurrentResponse, _> = serde_json::from_str(missing_main);
        assert!(result.is_err());
    }

    #[test]
    fn test_daily_groups_by_local_date_and_folds_range() {
        let payload = ForecastResponse {
            list: vec![
                sample(local_ts(2024, 7, 15, 6), 14.2, 12.6, 15.1, "light rain", 0.6),
                sample(local_ts(2024, 7, 15, 12), 21.0, 19.4, 22.3, "scattered clouds", 0.1),
                sample(local_ts(2024, 7, 15, 18), 18.0, 16.8, 18.9, "clear sky", 0.0),
                sample(local_ts(2024, 7, 16, 12), 23.5, 21.9, 24.6, "clear sky", 0.0),
            ],
        };

        let days = daily_from_payload(payload).expect("Failed to fold daily");

        assert_eq!(days.len(), 2);

        let first = &days[0];
        // Seeded by the 6am sample, range widened by the later ones
        assert_eq!(first.temperature, 14);
        assert_eq!(first.temp_min, 13);
        assert_eq!(first.temp_max, 22);
        assert!(first.temp_min <= first.temp_max);
        assert_eq!(first.description, "light rain");
        assert_eq!(first.precipitation_chance, 60);

        let second = &days[1];
        assert_eq!(second.temperature, 24);
        assert_eq!(second.description, "clear sky");
    }

    #[test]
    fn test_daily_min_max_commutes_but_first_wins_fields_do_not() {
        let morning = sample(local_ts(2024, 7, 15, 9), 14.0, 11.0, 15.0, "light rain", 0.8);
        let evening = sample(local_ts(2024, 7, 15, 18), 20.0, 18.0, 23.0, "clear sky", 0.0);

        let forward = daily_from_payload(ForecastResponse {
            list: vec![morning, evening],
        })
        .expect("forward fold");
        let morning = sample(local_ts(2024, 7, 15, 9), 14.0, 11.0, 15.0, "light rain", 0.8);
        let evening = sample(local_ts(2024, 7, 15, 18), 20.0, 18.0, 23.0, "clear sky", 0.0);
        let reversed = daily_from_payload(ForecastResponse {
            list: vec![evening, morning],
        })
        .expect("reversed fold");

        // The range fold is commutative
        assert_eq!(forward[0].temp_min, reversed[0].temp_min);
        assert_eq!(forward[0].temp_max, reversed[0].temp_max);
        assert_eq!(forward[0].temp_min, 11);
        assert_eq!(forward[0].temp_max, 23);

        // Everything else follows whichever sample came first in each order
        assert_eq!(forward[0].description, "light rain");
        assert_eq!(forward[0].precipitation_chance, 80);
        assert_eq!(forward[0].temperature, 14);
        assert_eq!(reversed[0].description, "clear sky");
        assert_eq!(reversed[0].precipitation_chance, 0);
        assert_eq!(reversed[0].temperature, 20);
    }

    #[test]
    fn test_daily_caps_at_seven_days_in_first_seen_order() {
        // 40 samples across 10 days, 4 per day
        let mut list = Vec::new();
        for day in 10..20 {
            for hour in [6, 9, 12, 15] {
                list.push(sample(
                    local_ts(2024, 7, day, hour),
                    20.0,
                    18.0,
                    22.0,
                    "clear sky",
                    0.0,
                ));
            }
        }
        assert_eq!(list.len(), 40);

        let days = daily_from_payload(ForecastResponse { list }).expect("Failed to fold daily");

        assert_eq!(days.len(), 7);
        // The first 7 distinct dates encountered, in feed order
        for window in days.windows(2) {
            assert!(window[0].date < window[1].date);
        }
        assert_eq!(days[0].date, Local.with_ymd_and_hms(2024, 7, 10, 6, 0, 0).unwrap().date_naive());
    }

    #[test]
    fn test_daily_with_empty_conditions_on_seed_sample_is_error() {
        let mut seed = sample(local_ts(2024, 7, 15, 9), 14.0, 11.0, 15.0, "light rain", 0.2);
        seed.weather.clear();

        let result = daily_from_payload(ForecastResponse { list: vec![seed] });

        assert!(matches!(result, Err(WeatherError::MissingField(_))));
    }

    #[test]
    fn test_hourly_takes_first_eight_in_feed_order() {
        let list: Vec<ForecastEntry> = (0..12)
            .map(|i| {
                sample(
                    local_ts(2024, 7, 15, 6) + i * 3 * 3600,
                    15.0 + i as f64,
                    14.0,
                    16.0,
                    "clear sky",
                    0.0,
                )
            })
            .collect();

        let hours = hourly_from_payload(ForecastResponse { list }).expect("Failed to map hourly");

        assert_eq!(hours.len(), 8);
        for (i, hour) in hours.iter().enumerate() {
            assert_eq!(hour.temperature, 15 + i as i32);
        }
    }

    #[test]
    fn test_hourly_returns_all_when_fewer_than_eight() {
        let list: Vec<ForecastEntry> = (0..3)
            .map(|i| {
                sample(
                    local_ts(2024, 7, 15, 6) + i * 3 * 3600,
                    15.0,
                    14.0,
                    16.0,
                    "clear sky",
                    0.35,
                )
            })
            .collect();

        let hours = hourly_from_payload(ForecastResponse { list }).expect("Failed to map hourly");

        assert_eq!(hours.len(), 3);
        assert_eq!(hours[0].precipitation_chance, 35);
    }

    #[test]
    fn test_hourly_labels_use_twelve_hour_clock() {
        let list = vec![
            sample(local_ts(2024, 7, 15, 17), 20.0, 18.0, 22.0, "clear sky", 0.0),
            sample(local_ts(2024, 7, 15, 0), 12.0, 11.0, 13.0, "clear sky", 0.0),
            sample(local_ts(2024, 7, 15, 12), 22.0, 20.0, 24.0, "clear sky", 0.0),
        ];

        let hours = hourly_from_payload(ForecastResponse { list }).expect("Failed to map hourly");

        assert_eq!(hours[0].time_label, "5 PM");
        assert_eq!(hours[1].time_label, "12 AM");
        assert_eq!(hours[2].time_label, "12 PM");
    }

    #[test]
    fn test_locations_from_payload_derives_ids() {
        let entries = vec![
            GeoEntry {
                name: "London".to_string(),
                country: "GB".to_string(),
                lat: 51.5073,
                lon: -0.1277,
            },
            GeoEntry {
                name: "London".to_string(),
                country: "CA".to_string(),
                lat: 42.9836,
                lon: -81.2497,
            },
        ];

        let locations = locations_from_payload(entries);

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].id, "london-gb");
        assert_eq!(locations[1].id, "london-ca");
        assert_eq!(locations[0].name, "London");
        assert!((locations[1].latitude - 42.9836).abs() < 0.0001);
    }

    #[test]
    fn test_cache_key_includes_kind_coords_and_units() {
        let key = cache_key("current", 51.5085, -0.1257, UnitSystem::Celsius);
        assert_eq!(key, "current|51.5085|-0.1257|metric");

        let imperial = cache_key("current", 51.5085, -0.1257, UnitSystem::Fahrenheit);
        assert_ne!(key, imperial);
    }
}
