//! Settings store: temperature unit preference
//!
//! Holds the current unit system, persists it through the external
//! key-value store, and broadcasts changes to subscribers. New subscribers
//! immediately receive the current value (replay-latest semantics), then
//! every subsequent change synchronously.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::kv::KvStore;

/// Persistence key for the unit preference
const UNITS_KEY: &str = "temperatureUnit";

/// Conversion factor from millimeters to inches
const MM_TO_INCHES: f64 = 0.039_370_1;

/// Unit system for temperature, wind, and rainfall display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Celsius, km/h, millimeters
    #[default]
    Metric,
    /// Fahrenheit, mph, inches
    Imperial,
}

impl Units {
    /// API query parameter value ("metric" / "imperial")
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    /// Parses the persisted/API form; anything unrecognized is `None`
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "metric" => Some(Units::Metric),
            "imperial" => Some(Units::Imperial),
            _ => None,
        }
    }

    /// Temperature unit symbol
    pub fn symbol(self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    /// Wind speed unit label
    pub fn wind_speed_unit(self) -> &'static str {
        match self {
            Units::Metric => "km/h",
            Units::Imperial => "mph",
        }
    }

    /// Rainfall unit label
    pub fn rainfall_unit(self) -> &'static str {
        match self {
            Units::Metric => "mm",
            Units::Imperial => "in",
        }
    }

    /// The other unit system
    pub fn toggled(self) -> Self {
        match self {
            Units::Metric => Units::Imperial,
            Units::Imperial => Units::Metric,
        }
    }

    /// Converts a rainfall amount reported in millimeters for display.
    ///
    /// Metric passes through; imperial converts to inches rounded to two
    /// decimal places.
    pub fn convert_rainfall(self, millimeters: f64) -> f64 {
        match self {
            Units::Metric => millimeters,
            Units::Imperial => (millimeters * MM_TO_INCHES * 100.0).round() / 100.0,
        }
    }
}

/// Publish/subscribe store for the unit preference
pub struct SettingsStore {
    kv: KvStore,
    current: Units,
    subscribers: Vec<Box<dyn Fn(Units) + Send>>,
}

impl SettingsStore {
    /// Creates a store, loading the persisted preference (default metric)
    pub fn new(kv: KvStore) -> Self {
        let current = kv
            .get(UNITS_KEY)
            .and_then(|s| Units::from_str(&s))
            .unwrap_or_default();
        Self {
            kv,
            current,
            subscribers: Vec::new(),
        }
    }

    /// The current unit preference
    pub fn units(&self) -> Units {
        self.current
    }

    /// Sets the unit preference, persists it, and notifies all subscribers
    pub fn set_units(&mut self, units: Units) {
        if let Err(e) = self.kv.set(UNITS_KEY, units.as_str()) {
            warn!(error = %e, "failed to persist unit preference");
        }
        self.current = units;
        for subscriber in &self.subscribers {
            subscriber(units);
        }
    }

    /// Registers a subscriber; it is invoked immediately with the current
    /// value and synchronously on every later change.
    pub fn subscribe(&mut self, subscriber: impl Fn(Units) + Send + 'static) {
        subscriber(self.current);
        self.subscribers.push(Box::new(subscriber));
    }
}
