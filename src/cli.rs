//! Command-line interface parsing for skywatch
//!
//! This module handles parsing of CLI arguments using clap, including the
//! --units override and API key resolution from the flag or environment.

use clap::Parser;
use thiserror::Error;

use crate::data::UnitSystem;

/// Environment variable consulted for the provider credential
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified unit system is not recognized
    #[error("Invalid unit system: '{0}'. Valid values: celsius, fahrenheit")]
    InvalidUnits(String),

    /// No API credential was supplied
    #[error("No API key provided. Set OPENWEATHER_API_KEY or pass --api-key")]
    MissingApiKey,
}

/// skywatch - current conditions and forecasts for your favorite cities
#[derive(Parser, Debug)]
#[command(name = "skywatch")]
#[command(about = "Terminal weather dashboard for your favorite cities")]
#[command(version)]
pub struct Cli {
    /// Unit system for this run: celsius or fahrenheit
    ///
    /// Without this flag the persisted preference is used
    /// (celsius on first run).
    #[arg(long, value_name = "UNITS")]
    pub units: Option<String>,

    /// OpenWeatherMap API key (overrides the OPENWEATHER_API_KEY variable)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Disable the periodic background refresh of current conditions
    #[arg(long)]
    pub no_refresh: bool,
}

/// Configuration derived from CLI arguments and the environment
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Unit system forced by --units, if any
    pub units_override: Option<UnitSystem>,
    /// Provider API credential
    pub api_key: String,
    /// Whether the background refresh timer runs
    pub refresh_enabled: bool,
}

/// Parses a unit system string argument.
///
/// # Arguments
/// * `s` - The unit system string from CLI
///
/// # Returns
/// * `Ok(UnitSystem)` if the string matches a known unit system
/// * `Err(CliError::InvalidUnits)` otherwise
pub fn parse_units_arg(s: &str) -> Result<UnitSystem, CliError> {
    match s.to_lowercase().as_str() {
        "celsius" | "c" | "metric" => Ok(UnitSystem::Celsius),
        "fahrenheit" | "f" | "imperial" => Ok(UnitSystem::Fahrenheit),
        _ => Err(CliError::InvalidUnits(s.to_string())),
    }
}

impl StartupConfig {
    /// Builds startup configuration from parsed CLI arguments.
    ///
    /// The API key comes from --api-key when present, otherwise from the
    /// OPENWEATHER_API_KEY environment variable.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` on an invalid unit system or a missing API key
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let units_override = cli.units.as_deref().map(parse_units_arg).transpose()?;

        let api_key = cli
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.is_empty())
            .ok_or(CliError::MissingApiKey)?;

        Ok(Self {
            units_override,
            api_key,
            refresh_enabled: !cli.no_refresh,
        })
    }
}
