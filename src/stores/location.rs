//! Location store: the last-known location
//!
//! Holds a single "last known" location (no history), persists it through
//! the external key-value store, and broadcasts every change (including
//! clearing) to subscribers with replay-latest semantics.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::kv::KvStore;

/// Persistence key for the last-known location
const LOCATION_KEY: &str = "lastLocation";

/// A named geographic position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
    /// Display name (city)
    pub name: String,
}

impl Location {
    pub fn new(lat: f64, lon: f64, name: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            name: name.into(),
        }
    }
}

/// Publish/subscribe store for the last-known location
pub struct LocationStore {
    kv: KvStore,
    current: Option<Location>,
    subscribers: Vec<Box<dyn Fn(Option<&Location>) + Send>>,
}

impl LocationStore {
    /// Creates a store, loading any persisted location
    pub fn new(kv: KvStore) -> Self {
        let current = kv
            .get(LOCATION_KEY)
            .and_then(|json| serde_json::from_str(&json).ok());
        Self {
            kv,
            current,
            subscribers: Vec::new(),
        }
    }

    /// The current last-known location, if any
    pub fn location(&self) -> Option<&Location> {
        self.current.as_ref()
    }

    /// Saves a location as the last-known one and notifies subscribers
    pub fn set_location(&mut self, location: Location) {
        match serde_json::to_string(&location) {
            Ok(json) => {
                if let Err(e) = self.kv.set(LOCATION_KEY, &json) {
                    warn!(error = %e, "failed to persist location");
                }
            }
            Err(e) => warn!(error = %e, "failed to encode location"),
        }
        self.current = Some(location);
        self.notify();
    }

    /// Clears the saved location and notifies subscribers with `None`
    pub fn clear(&mut self) {
        if let Err(e) = self.kv.remove(LOCATION_KEY) {
            warn!(error = %e, "failed to clear persisted location");
        }
        self.current = None;
        self.notify();
    }

    /// Registers a subscriber; it is invoked immediately with the current
    /// value and synchronously on every later change.
    pub fn subscribe(&mut self, subscriber: impl Fn(Option<&Location>) + Send + 'static) {
        subscriber(self.current.as_ref());
        self.subscribers.push(Box::new(subscriber));
    }

    fn notify(&self) {
        for subscriber in &self.subscribers {
            subscriber(self.current.as_ref());
        }
    }
}
