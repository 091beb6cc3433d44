//! Geocoding and reverse-geocoding client
//!
//! Translates city names into coordinates and coordinates back into place
//! names using the OpenWeatherMap geo API. Requests go through the offline
//! gateway like all other traffic.

use std::sync::Arc;

use serde::Deserialize;

use super::{decode, ApiError, Fetched};
use crate::worker::{FetchGateway, FetchRequest, Fetcher};

/// Direct geocoding endpoint (city name to coordinates)
const GEOCODING_URL: &str = "http://api.openweathermap.org/geo/1.0/direct";

/// Reverse geocoding endpoint (coordinates to place name)
const REVERSE_GEOCODING_URL: &str = "https://api.openweathermap.org/geo/1.0/reverse";

/// A place returned by the geo API
#[derive(Debug, Clone, Deserialize)]
pub struct GeoPlace {
    /// Place name
    pub name: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
    /// ISO country code
    #[serde(default)]
    pub country: Option<String>,
    /// State or region, when the API provides one
    #[serde(default)]
    pub state: Option<String>,
}

/// Client for the OpenWeatherMap geocoding endpoints
pub struct GeocodingClient<F: Fetcher> {
    gateway: Arc<FetchGateway<F>>,
    api_key: String,
}

impl<F: Fetcher> GeocodingClient<F> {
    pub fn new(gateway: Arc<FetchGateway<F>>, api_key: impl Into<String>) -> Self {
        Self {
            gateway,
            api_key: api_key.into(),
        }
    }

    /// Looks up the best match for a city name (limit 1, as the upstream
    /// app does). An empty result list means the input matched nothing;
    /// the caller decides how to present that.
    pub async fn geocode(&self, city: &str) -> Result<Fetched<Vec<GeoPlace>>, ApiError> {
        let url = format!(
            "{}?q={}&limit=1&appid={}",
            GEOCODING_URL,
            city.trim(),
            self.api_key
        );
        let response = self.gateway.handle_fetch(&FetchRequest::get(url)).await;
        decode(response)
    }

    /// Looks up the place name for a coordinate pair
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Fetched<Vec<GeoPlace>>, ApiError> {
        let url = format!(
            "{}?lat={}&lon={}&limit=1&appid={}",
            REVERSE_GEOCODING_URL, lat, lon, self.api_key
        );
        let response = self.gateway.handle_fetch(&FetchRequest::get(url)).await;
        decode(response)
    }
}
