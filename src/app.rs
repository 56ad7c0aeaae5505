//! Application state management for skywatch
//!
//! This module contains the main application state: the per-location
//! aggregation map, keyboard input handling, the favorites list, and the
//! fetch flows that populate state from the weather client.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::cli::StartupConfig;
use crate::data::{
    CurrentConditions, DailyForecast, HourlyForecast, Location, UnitSystem, WeatherClient,
    WeatherError,
};
use crate::store::{Settings, SettingsStore, SETTINGS_NAMESPACE};

/// How long search input must stay quiet before a lookup is issued
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while the first fetch is in flight
    Loading,
    /// Card list of favorite locations
    Dashboard,
    /// Forecast detail for a specific location
    Detail(String),
    /// Search overlay for adding a favorite
    Search,
}

/// Aggregated weather for one favorite location
///
/// `None` fields mean "not yet loaded", never an error. Values survive
/// later fetch failures and refreshes, so a partially-populated card stays
/// on screen while new data is in flight.
#[derive(Debug, Clone, Default)]
pub struct LocationWeather {
    /// Latest current-conditions snapshot
    pub current: Option<CurrentConditions>,
    /// Folded daily forecast (at most 7 days)
    pub forecast: Option<Vec<DailyForecast>>,
    /// Next ~24 hours in 3-hour steps (at most 8 entries)
    pub hourly: Option<Vec<HourlyForecast>>,
    /// Whether a fetch for this location is in flight
    pub is_loading: bool,
    /// Human-readable message from the most recent failed fetch
    pub last_error: Option<String>,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Index of the currently selected favorite in the dashboard
    pub selected_index: usize,
    /// Followed locations, in display order
    pub favorites: Vec<Location>,
    /// Active unit system
    pub units: UnitSystem,
    /// Aggregated weather keyed by location id
    weather: HashMap<String, LocationWeather>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Timestamp of the last completed refresh
    pub last_refresh: Option<DateTime<Local>>,
    /// Flag indicating a full refresh has been requested
    pub refresh_requested: bool,
    /// Search overlay input buffer
    pub search_input: String,
    /// Results of the last completed search lookup
    pub search_results: Vec<Location>,
    /// Index of the highlighted search result
    pub search_selected: usize,
    /// Message from the last failed search lookup
    pub search_error: Option<String>,
    /// Search result picked with Enter, waiting for the main loop to add it
    pending_add: Option<Location>,
    /// Whether search input changed since the last lookup
    search_pending: bool,
    /// When the search input last changed
    last_keystroke: Option<Instant>,
    /// Weather API client
    client: WeatherClient,
    /// Settings persistence, absent when no config directory exists
    store: Option<SettingsStore>,
}

impl App {
    /// Creates a new App, loading persisted favorites and unit preference
    ///
    /// # Arguments
    /// * `config` - Startup configuration derived from CLI arguments
    pub fn new(config: &StartupConfig) -> Self {
        let store = SettingsStore::new();
        let settings: Settings = store
            .as_ref()
            .and_then(|store| store.load(SETTINGS_NAMESPACE))
            .unwrap_or_default();

        Self {
            state: AppState::Loading,
            selected_index: 0,
            favorites: settings.favorites,
            units: config.units_override.unwrap_or(settings.units),
            weather: HashMap::new(),
            should_quit: false,
            last_refresh: None,
            refresh_requested: false,
            search_input: String::new(),
            search_results: Vec::new(),
            search_selected: 0,
            search_error: None,
            pending_add: None,
            search_pending: false,
            last_keystroke: None,
            client: WeatherClient::new(config.api_key.clone()),
            store,
        }
    }

    /// Creates an App with a custom client and no settings store (for testing)
    #[cfg(test)]
    pub fn with_client(client: WeatherClient) -> Self {
        Self {
            state: AppState::Dashboard,
            selected_index: 0,
            favorites: Vec::new(),
            units: UnitSystem::Celsius,
            weather: HashMap::new(),
            should_quit: false,
            last_refresh: None,
            refresh_requested: false,
            search_input: String::new(),
            search_results: Vec::new(),
            search_selected: 0,
            search_error: None,
            pending_add: None,
            search_pending: false,
            last_keystroke: None,
            client,
            store: None,
        }
    }

    /// Returns the number of favorite locations
    pub fn favorite_count(&self) -> usize {
        self.favorites.len()
    }

    /// Returns the currently selected favorite, if any
    pub fn selected_favorite(&self) -> Option<&Location> {
        self.favorites.get(self.selected_index)
    }

    /// Returns the aggregated weather for a location id
    pub fn weather_for(&self, location_id: &str) -> Option<&LocationWeather> {
        self.weather.get(location_id)
    }

    /// Marks a location's fetch as started, clearing any previous error
    pub fn begin_fetch(&mut self, location_id: &str) {
        let entry = self.weather.entry(location_id.to_string()).or_default();
        entry.is_loading = true;
        entry.last_error = None;
    }

    /// Records the outcome of a current-conditions fetch
    ///
    /// Completions apply in arrival order: a response from a superseded
    /// request (e.g. one fired before a unit toggle) still lands here, and
    /// the last write wins.
    pub fn finish_current(
        &mut self,
        location_id: &str,
        outcome: Result<CurrentConditions, WeatherError>,
    ) {
        let entry = self.weather.entry(location_id.to_string()).or_default();
        entry.is_loading = false;
        match outcome {
            Ok(current) => {
                entry.current = Some(current);
                entry.last_error = None;
            }
            Err(err) => entry.last_error = Some(err.to_string()),
        }
    }

    /// Records the outcome of a daily-forecast fetch
    pub fn finish_forecast(
        &mut self,
        location_id: &str,
        outcome: Result<Vec<DailyForecast>, WeatherError>,
    ) {
        let entry = self.weather.entry(location_id.to_string()).or_default();
        entry.is_loading = false;
        match outcome {
            Ok(days) => {
                entry.forecast = Some(days);
                entry.last_error = None;
            }
            Err(err) => entry.last_error = Some(err.to_string()),
        }
    }

    /// Records the outcome of an hourly-forecast fetch
    pub fn finish_hourly(
        &mut self,
        location_id: &str,
        outcome: Result<Vec<HourlyForecast>, WeatherError>,
    ) {
        let entry = self.weather.entry(location_id.to_string()).or_default();
        entry.is_loading = false;
        match outcome {
            Ok(hours) => {
                entry.hourly = Some(hours);
                entry.last_error = None;
            }
            Err(err) => entry.last_error = Some(err.to_string()),
        }
    }

    /// Fetches all three measurement kinds for every favorite concurrently
    ///
    /// Transitions from the initial loading state to the dashboard once the
    /// sweep completes. One location's failure never aborts its siblings;
    /// the error lands in that location's entry alone.
    pub async fn load_all(&mut self) {
        let favorites: Vec<Location> = self.favorites.clone();

        for location in &favorites {
            self.begin_fetch(&location.id);
        }

        let fetches = favorites.iter().map(|location| {
            let client = &self.client;
            let units = self.units;
            async move {
                tokio::join!(
                    client.fetch_current(location.latitude, location.longitude, units),
                    client.fetch_daily_forecast(location.latitude, location.longitude, units),
                    client.fetch_hourly_forecast(location.latitude, location.longitude, units),
                )
            }
        });
        let results = futures::future::join_all(fetches).await;

        for (location, (current, forecast, hourly)) in favorites.iter().zip(results) {
            self.finish_current(&location.id, current);
            self.finish_forecast(&location.id, forecast);
            self.finish_hourly(&location.id, hourly);
        }

        self.last_refresh = Some(Local::now());
        if self.state == AppState::Loading {
            self.state = AppState::Dashboard;
        }
    }

    /// Re-fetches current conditions for every favorite (periodic refresh)
    ///
    /// A sweep that lands inside a warm cache window completes without any
    /// transport call.
    pub async fn refresh_current_sweep(&mut self) {
        let favorites: Vec<Location> = self.favorites.clone();

        for location in &favorites {
            self.begin_fetch(&location.id);
        }

        let fetches = favorites.iter().map(|location| {
            self.client
                .fetch_current(location.latitude, location.longitude, self.units)
        });
        let results = futures::future::join_all(fetches).await;

        for (location, outcome) in favorites.iter().zip(results) {
            self.finish_current(&location.id, outcome);
        }

        self.last_refresh = Some(Local::now());
    }

    /// Fetches all three measurement kinds for a single location
    pub async fn load_location(&mut self, location: Location) {
        self.begin_fetch(&location.id);

        let units = self.units;
        let (current, forecast, hourly) = tokio::join!(
            self.client
                .fetch_current(location.latitude, location.longitude, units),
            self.client
                .fetch_daily_forecast(location.latitude, location.longitude, units),
            self.client
                .fetch_hourly_forecast(location.latitude, location.longitude, units),
        );

        self.finish_current(&location.id, current);
        self.finish_forecast(&location.id, forecast);
        self.finish_hourly(&location.id, hourly);
    }

    /// Adds a search result to favorites and kicks off its first fetch
    ///
    /// Already-followed locations are ignored; uniqueness is by location id.
    pub async fn add_favorite(&mut self, location: Location) {
        if self.favorites.iter().any(|fav| fav.id == location.id) {
            return;
        }

        self.favorites.push(location.clone());
        self.selected_index = self.favorites.len() - 1;
        self.persist_settings();
        self.load_location(location).await;
    }

    /// Removes the selected favorite and deletes its weather entry entirely
    pub fn remove_selected_favorite(&mut self) {
        if self.favorites.is_empty() {
            return;
        }

        let index = self.selected_index.min(self.favorites.len() - 1);
        let removed = self.favorites.remove(index);
        self.weather.remove(&removed.id);
        self.selected_index = self
            .selected_index
            .min(self.favorites.len().saturating_sub(1));
        self.persist_settings();
    }

    /// Takes the search result picked with Enter, if any
    pub fn take_pending_add(&mut self) -> Option<Location> {
        self.pending_add.take()
    }

    /// Records that the search input changed, restarting the debounce window
    pub fn search_input_changed(&mut self) {
        self.last_keystroke = Some(Instant::now());
        self.search_pending = true;
    }

    /// True when the debounce window has elapsed and a lookup should run
    pub fn search_due(&self, now: Instant) -> bool {
        self.search_pending
            && self
                .last_keystroke
                .is_some_and(|at| now.duration_since(at) >= SEARCH_DEBOUNCE)
    }

    /// Runs the pending search lookup
    pub async fn run_search(&mut self) {
        self.search_pending = false;
        let query = self.search_input.clone();

        match self.client.search_locations(&query).await {
            Ok(results) => {
                self.search_results = results;
                self.search_selected = 0;
                self.search_error = None;
            }
            Err(err) => {
                self.search_results.clear();
                self.search_error = Some(err.to_string());
            }
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc` (in Dashboard): Quit the application
    /// - `Up`/`k`, `Down`/`j`: Move selection in the dashboard
    /// - `Enter`: Open the selected location's detail view
    /// - `/` or `s`: Open the search overlay
    /// - `u`: Toggle unit system and refetch everything
    /// - `d`: Remove the selected favorite
    /// - `r`: Request a full refresh
    /// - `Esc` (in Detail/Search): Go back to the dashboard
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        match self.state {
            AppState::Loading => {
                // Only quit is allowed during the initial load
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::Dashboard => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection_up();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection_down();
                }
                KeyCode::Enter => {
                    if let Some(location) = self.selected_favorite() {
                        self.state = AppState::Detail(location.id.clone());
                    }
                }
                KeyCode::Char('/') | KeyCode::Char('s') => {
                    self.open_search();
                }
                KeyCode::Char('u') => {
                    self.toggle_units();
                }
                KeyCode::Char('d') => {
                    self.remove_selected_favorite();
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                _ => {}
            },
            AppState::Detail(_) => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc => {
                    self.state = AppState::Dashboard;
                }
                KeyCode::Char('u') => {
                    self.toggle_units();
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                _ => {}
            },
            AppState::Search => match key_event.code {
                KeyCode::Esc => {
                    self.search_pending = false;
                    self.state = AppState::Dashboard;
                }
                KeyCode::Enter => {
                    if let Some(location) = self.search_results.get(self.search_selected).cloned() {
                        self.pending_add = Some(location);
                        self.search_pending = false;
                        self.state = AppState::Dashboard;
                    }
                }
                KeyCode::Up => {
                    self.search_selected = self.search_selected.saturating_sub(1);
                }
                KeyCode::Down => {
                    if self.search_selected + 1 < self.search_results.len() {
                        self.search_selected += 1;
                    }
                }
                KeyCode::Backspace => {
                    self.search_input.pop();
                    self.search_input_changed();
                }
                KeyCode::Char(c) => {
                    self.search_input.push(c);
                    self.search_input_changed();
                }
                _ => {}
            },
        }
    }

    /// Switches unit systems and requests a full refetch
    ///
    /// Fetches already in flight under the old unit system are not
    /// cancelled; their responses race the new ones and whichever resolves
    /// last wins the state update.
    fn toggle_units(&mut self) {
        self.units = self.units.toggled();
        self.persist_settings();
        self.refresh_requested = true;
    }

    /// Opens the search overlay with a cleared query
    fn open_search(&mut self) {
        self.state = AppState::Search;
        self.search_input.clear();
        self.search_results.clear();
        self.search_selected = 0;
        self.search_error = None;
        self.search_pending = false;
        self.last_keystroke = None;
    }

    /// Moves the selection up in the dashboard, wrapping to bottom at top
    fn move_selection_up(&mut self) {
        let count = self.favorite_count();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down in the dashboard, wrapping to top at bottom
    fn move_selection_down(&mut self) {
        let count = self.favorite_count();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    /// Writes the favorites list and unit preference to the settings store
    fn persist_settings(&self) {
        if let Some(ref store) = self.store {
            let settings = Settings {
                favorites: self.favorites.clone(),
                units: self.units,
            };
            let _ = store.save(SETTINGS_NAMESPACE, &settings);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> App {
        App::with_client(WeatherClient::new("test-key"))
    }

    fn test_location(id: &str) -> Location {
        Location {
            id: id.to_string(),
            name: "Test".to_string(),
            country: "GB".to_string(),
            latitude: 51.5,
            longitude: -0.12,
        }
    }

    fn test_conditions() -> CurrentConditions {
        CurrentConditions {
            city: "London".to_string(),
            country: "GB".to_string(),
            latitude: 51.5,
            longitude: -0.12,
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
        }
    }

    fn fetch_error() -> WeatherError {
        WeatherError::MissingField("weather".to_string())
    }

    #[test]
    fn test_begin_fetch_sets_loading_and_clears_error() {
        let mut app = test_app();
        app.finish_current("london-gb", Err(fetch_error()));
        assert!(app.weather_for("london-gb").unwrap().last_error.is_some());

        app.begin_fetch("london-gb");

        let entry = app.weather_for("london-gb").unwrap();
        assert!(entry.is_loading);
        assert!(entry.last_error.is_none());
    }

    #[test]
    fn test_successful_fetch_populates_and_clears_error() {
        let mut app = test_app();
        app.begin_fetch("london-gb");

        app.finish_current("london-gb", Ok(test_conditions()));

        let entry = app.weather_for("london-gb").unwrap();
        assert!(!entry.is_loading);
        assert!(entry.last_error.is_none());
        assert_eq!(entry.current.as_ref().unwrap().city, "London");
    }

    #[test]
    fn test_failed_fetch_sets_error_and_keeps_stale_data() {
        let mut app = test_app();
        app.begin_fetch("london-gb");
        app.finish_current("london-gb", Ok(test_conditions()));

        app.begin_fetch("london-gb");
        app.finish_current("london-gb", Err(fetch_error()));

        let entry = app.weather_for("london-gb").unwrap();
        assert!(!entry.is_loading);
        assert!(entry.last_error.is_some());
        // The previous snapshot survives the failure
        assert!(entry.current.is_some());
    }

    #[test]
    fn test_refresh_keeps_other_kinds_stale_data() {
        let mut app = test_app();
        app.finish_forecast("london-gb", Ok(Vec::new()));
        app.finish_hourly("london-gb", Ok(Vec::new()));

        app.begin_fetch("london-gb");

        let entry = app.weather_for("london-gb").unwrap();
        assert!(entry.is_loading);
        assert!(entry.forecast.is_some());
        assert!(entry.hourly.is_some());
    }

    #[test]
    fn test_locations_fail_independently() {
        let mut app = test_app();
        app.begin_fetch("london-gb");
        app.begin_fetch("paris-fr");

        app.finish_current("london-gb", Err(fetch_error()));
        app.finish_current("paris-fr", Ok(test_conditions()));

        assert!(app.weather_for("london-gb").unwrap().last_error.is_some());
        assert!(app.weather_for("paris-fr").unwrap().last_error.is_none());
        assert!(app.weather_for("paris-fr").unwrap().current.is_some());
    }

    #[test]
    fn test_remove_selected_favorite_deletes_weather_entry() {
        let mut app = test_app();
        app.favorites.push(test_location("london-gb"));
        app.finish_current("london-gb", Ok(test_conditions()));

        app.remove_selected_favorite();

        assert!(app.favorites.is_empty());
        assert!(app.weather_for("london-gb").is_none());
    }

    #[test]
    fn test_remove_clamps_selection() {
        let mut app = test_app();
        app.favorites.push(test_location("a"));
        app.favorites.push(test_location("b"));
        app.selected_index = 1;

        app.remove_selected_favorite();

        assert_eq!(app.favorites.len(), 1);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_selection_wraps_in_both_directions() {
        let mut app = test_app();
        app.favorites.push(test_location("a"));
        app.favorites.push(test_location("b"));
        app.favorites.push(test_location("c"));

        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.selected_index, 2);

        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_enter_opens_detail_for_selected() {
        let mut app = test_app();
        app.favorites.push(test_location("london-gb"));

        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.state, AppState::Detail("london-gb".to_string()));
    }

    #[test]
    fn test_enter_with_no_favorites_stays_on_dashboard() {
        let mut app = test_app();

        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.state, AppState::Dashboard);
    }

    #[test]
    fn test_escape_returns_from_detail() {
        let mut app = test_app();
        app.state = AppState::Detail("london-gb".to_string());

        app.handle_key(key_event(KeyCode::Esc));

        assert_eq!(app.state, AppState::Dashboard);
    }

    #[test]
    fn test_unit_toggle_requests_refresh() {
        let mut app = test_app();
        assert_eq!(app.units, UnitSystem::Celsius);

        app.handle_key(key_event(KeyCode::Char('u')));

        assert_eq!(app.units, UnitSystem::Fahrenheit);
        assert!(app.refresh_requested);
    }

    #[test]
    fn test_search_overlay_collects_input() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        assert_eq!(app.state, AppState::Search);

        app.handle_key(key_event(KeyCode::Char('l')));
        app.handle_key(key_event(KeyCode::Char('d')));
        assert_eq!(app.search_input, "ld");

        app.handle_key(key_event(KeyCode::Backspace));
        assert_eq!(app.search_input, "l");
    }

    #[test]
    fn test_search_open_resets_previous_session() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Char('x')));
        app.handle_key(key_event(KeyCode::Esc));

        app.handle_key(key_event(KeyCode::Char('/')));

        assert_eq!(app.search_input, "");
        assert!(!app.search_due(Instant::now() + SEARCH_DEBOUNCE));
    }

    #[test]
    fn test_search_debounce_window() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Char('l')));

        // Immediately after the keystroke the window hasn't elapsed
        assert!(!app.search_due(Instant::now()));
        // One debounce interval later it has
        assert!(app.search_due(Instant::now() + SEARCH_DEBOUNCE));
    }

    #[test]
    fn test_search_enter_queues_pending_add() {
        let mut app = test_app();
        app.state = AppState::Search;
        app.search_results.push(test_location("london-gb"));

        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.state, AppState::Dashboard);
        let pending = app.take_pending_add().expect("Should queue the pick");
        assert_eq!(pending.id, "london-gb");
        assert!(app.take_pending_add().is_none());
    }

    #[test]
    fn test_search_enter_without_results_is_noop() {
        let mut app = test_app();
        app.state = AppState::Search;

        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.state, AppState::Search);
        assert!(app.take_pending_add().is_none());
    }

    #[test]
    fn test_quit_from_dashboard() {
        let mut app = test_app();

        app.handle_key(key_event(KeyCode::Char('q')));

        assert!(app.should_quit);
    }

    #[test]
    fn test_q_types_into_search_instead_of_quitting() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));

        app.handle_key(key_event(KeyCode::Char('q')));

        assert!(!app.should_quit);
        assert_eq!(app.search_input, "q");
    }

    #[tokio::test]
    async fn test_add_favorite_ignores_duplicates() {
        let mut app = test_app();
        app.favorites.push(test_location("london-gb"));

        app.add_favorite(test_location("london-gb")).await;

        assert_eq!(app.favorites.len(), 1);
    }
}
