//! skywatch - a terminal weather dashboard
//!
//! A terminal UI application that shows current conditions, a 7-day
//! forecast, and an hourly outlook for a user-curated list of cities,
//! backed by the OpenWeatherMap API.

mod app;
mod cache;
mod cli;
mod data;
mod refresh;
mod store;
mod ui;

use std::io;
use std::panic;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use app::{App, AppState};
use refresh::{RefreshConfig, RefreshHandle, RefreshMessage};

/// Sets up a panic hook that restores the terminal before printing the panic
/// message. This ensures the terminal is usable even if the application
/// panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    match &app.state {
        AppState::Loading => {
            render_loading(frame);
        }
        AppState::Dashboard => {
            ui::render_dashboard(frame, app);
        }
        AppState::Detail(location_id) => {
            ui::render_detail(frame, app, location_id);
        }
        AppState::Search => {
            ui::render_dashboard(frame, app);
            ui::render_search(frame, app);
        }
    }
}

/// Renders a loading message while the first fetch is in flight
fn render_loading(frame: &mut ratatui::Frame) {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Color, Style},
        widgets::Paragraph,
    };

    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Loading weather data...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli_args = cli::Cli::parse();
    let config = match cli::StartupConfig::from_cli(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app instance
    let mut app = App::new(&config);

    // Initial render to show loading state
    terminal.draw(|f| render_ui(f, &app))?;

    // Trigger initial data load
    app.load_all().await;

    // Start the background refresh timer
    let mut refresh_handle = RefreshHandle::spawn(RefreshConfig {
        enabled: config.refresh_enabled,
        ..Default::default()
    });

    // Main event loop
    loop {
        // Render UI
        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Drain refresh ticks; coalesce into at most one sweep per loop pass
        let mut sweep_due = false;
        while let Some(RefreshMessage::CurrentSweepDue) = refresh::try_recv(&mut refresh_handle) {
            sweep_due = true;
        }
        if sweep_due {
            app.refresh_current_sweep().await;
        }

        // Full refetch after a unit toggle or an explicit request
        if app.refresh_requested {
            app.refresh_requested = false;
            app.load_all().await;
        }

        // Add a search pick to favorites
        if let Some(location) = app.take_pending_add() {
            app.add_favorite(location).await;
        }

        // Run a search once the input has been quiet long enough
        if app.search_due(Instant::now()) {
            app.run_search().await;
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Stop background work before tearing down the terminal
    refresh_handle.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
