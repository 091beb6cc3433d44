//! OpenWeatherMap API clients
//!
//! Stateless request/response wrappers around the geocoding and one-call
//! weather endpoints. Every request is routed through the offline fetch
//! gateway, so callers transparently get cached data when the network is
//! down; the gateway's marker header is surfaced as [`Fetched::from_cache`].

pub mod geocoding;
pub mod weather;

pub use geocoding::{GeoPlace, GeocodingClient};
pub use weather::{CurrentConditions, DailyForecast, OneCall, WeatherClient, WeatherSummary};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::worker::{FetchResponse, OFFLINE_HEADER};

/// Errors surfaced by the API clients
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upstream returned a non-200 status (bad API key, rate limit, ...)
    #[error("HTTP {0} from weather API")]
    Status(u16),

    /// Offline with no cached response for this request
    #[error("offline and no cached data is available")]
    Offline,

    /// The response body was not the expected JSON shape
    #[error("failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A decoded payload plus whether it was served from the offline cache
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    /// The decoded response body
    pub data: T,
    /// True when the gateway served this from cache rather than the network
    pub from_cache: bool,
}

/// Shape of the gateway's synthetic offline-no-cache payload
#[derive(Debug, Deserialize)]
struct OfflineMarker {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    offline: bool,
}

/// Decodes a gateway response into a typed payload.
///
/// The gateway's synthetic offline payload (error + offline flags) maps to
/// [`ApiError::Offline`]; upstream HTTP errors map to [`ApiError::Status`].
pub(crate) fn decode<T: DeserializeOwned>(response: FetchResponse) -> Result<Fetched<T>, ApiError> {
    let from_cache = response
        .header(OFFLINE_HEADER)
        .is_some_and(|v| v == "true");

    if from_cache {
        if let Ok(marker) = serde_json::from_slice::<OfflineMarker>(&response.body) {
            if marker.error && marker.offline {
                return Err(ApiError::Offline);
            }
        }
    }

    if !response.is_ok() {
        return Err(ApiError::Status(response.status));
    }

    let data = serde_json::from_slice(&response.body)?;
    Ok(Fetched { data, from_cache })
}
