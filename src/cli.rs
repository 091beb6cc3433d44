//! Command-line interface parsing for Skycast
//!
//! This module handles parsing of CLI arguments using clap, including an
//! optional city argument that starts the app on the search tab with a
//! forecast already loaded, plus overrides for the starting tab and units.

use clap::Parser;
use thiserror::Error;

use crate::app::Tab;
use crate::stores::Units;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified tab name is not recognized
    #[error("Invalid tab: '{0}'. Valid tabs: current, search, settings")]
    InvalidTab(String),
    /// The specified unit system is not recognized
    #[error("Invalid units: '{0}'. Valid units: metric, imperial")]
    InvalidUnits(String),
}

/// Skycast - current conditions and forecasts in your terminal
#[derive(Parser, Debug)]
#[command(name = "skycast")]
#[command(about = "Terminal weather: current conditions, forecast search, offline cache")]
#[command(version)]
pub struct Cli {
    /// City to look up on startup
    ///
    /// Examples:
    ///   skycast            # Open on the current conditions tab
    ///   skycast Oslo       # Open on the search tab with Oslo loaded
    pub city: Option<String>,

    /// Tab to open on: current, search, settings
    #[arg(long, value_name = "TAB")]
    pub tab: Option<String>,

    /// Unit system for this session: metric, imperial
    ///
    /// Overrides the saved preference without persisting it.
    #[arg(long, value_name = "UNITS")]
    pub units: Option<String>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    /// Tab to open on (if specified)
    pub initial_tab: Option<Tab>,
    /// City to search for immediately (if specified)
    pub initial_city: Option<String>,
    /// Session-only unit override (if specified)
    pub units_override: Option<Units>,
}

/// Parses a tab name argument into a Tab enum.
pub fn parse_tab_arg(s: &str) -> Result<Tab, CliError> {
    Tab::from_str(s).ok_or_else(|| CliError::InvalidTab(s.to_string()))
}

/// Parses a unit system argument into a Units enum.
pub fn parse_units_arg(s: &str) -> Result<Units, CliError> {
    Units::from_str(s).ok_or_else(|| CliError::InvalidUnits(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// A city argument implies the search tab unless --tab says otherwise.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let units_override = cli.units.as_deref().map(parse_units_arg).transpose()?;
        let mut initial_tab = cli.tab.as_deref().map(parse_tab_arg).transpose()?;
        if initial_tab.is_none() && cli.city.is_some() {
            initial_tab = Some(Tab::Search);
        }
        Ok(StartupConfig {
            initial_tab,
            initial_city: cli.city.clone(),
            units_override,
        })
    }
}
