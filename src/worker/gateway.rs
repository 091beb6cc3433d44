//! Offline fetch gateway
//!
//! Every outbound HTTP request the app makes is
//! routed through [`FetchGateway::handle_fetch`], which classifies it and
//! applies one of two strategies:
//!
//! - API requests (weather data, geocoding, icon host) are network-first:
//!   live responses are cached and returned; when the network fails, the
//!   cached copy is served with an `X-Offline: true` marker header, or a
//!   structured JSON error payload is synthesized.
//! - Static asset requests are cache-first: a hit short-circuits the
//!   network; a miss fetches and caches; a double failure synthesizes an
//!   offline HTML page (navigations) or a plain-text fallback.
//!
//! `install` pre-caches the app-shell manifest and `activate` garbage
//! collects buckets left behind by previous cache versions.

use std::io;

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::cache::CacheStorage;
use super::fetcher::{FetchError, FetchRequest, FetchResponse, Fetcher};

/// Marker header added to responses that did not come from a live fetch
pub const OFFLINE_HEADER: &str = "X-Offline";

/// Bucket holding pre-cached app-shell assets. Bumping the version tag
/// causes the old bucket to be garbage collected on the next activation.
pub const STATIC_CACHE_NAME: &str = "weather-app-cache-v1";

/// Bucket holding cached API responses; versioned like the static bucket
pub const API_CACHE_NAME: &str = "weather-api-cache-v1";

/// Substring patterns identifying API requests: weather data endpoint,
/// geocoding endpoint, and the weather icon image host.
pub const API_URL_PATTERNS: &[&str] = &[
    "api.openweathermap.org/data/",
    "api.openweathermap.org/geo/",
    "openweathermap.org/img/wn/",
];

/// App-shell paths pre-cached at install time, relative to the shell origin
pub const APP_SHELL_PATHS: &[&str] = &[
    "/",
    "/index.html",
    "/manifest.webmanifest",
    "/favicon.ico",
    "/styles.css",
    "/main.js",
    "/assets/icon/icon-192.png",
    "/assets/icon/icon-512.png",
];

/// Body served for navigation requests when both cache and network fail
const OFFLINE_PAGE: &str = "<!doctype html>\
<html><head><meta charset=\"utf-8\"><title>Offline</title></head>\
<body><h1>You are offline.</h1>\
<p>Please check your connection and try again.</p></body></html>";

/// Body served for non-navigation static requests when both cache and
/// network fail
const OFFLINE_FALLBACK_TEXT: &str = "Offline content not available.";

/// Message embedded in the synthetic API offline payload
const OFFLINE_NO_CACHE_MESSAGE: &str = "offline and not cached";

/// Gateway configuration: bucket names, classification patterns, and the
/// install-time pre-cache manifest.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Name of the static asset bucket
    pub static_cache_name: String,
    /// Name of the API response bucket
    pub api_cache_name: String,
    /// URL substring patterns classifying a request as an API request
    pub api_patterns: Vec<String>,
    /// Absolute URLs pre-cached into the static bucket at install time
    pub precache_manifest: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            static_cache_name: STATIC_CACHE_NAME.to_string(),
            api_cache_name: API_CACHE_NAME.to_string(),
            api_patterns: API_URL_PATTERNS.iter().map(|p| p.to_string()).collect(),
            precache_manifest: Vec::new(),
        }
    }
}

impl GatewayConfig {
    /// Default configuration with the app-shell manifest resolved against
    /// the given origin (e.g. `https://weather.example.com`).
    pub fn with_shell_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            precache_manifest: APP_SHELL_PATHS
                .iter()
                .map(|path| format!("{origin}{path}"))
                .collect(),
            ..Self::default()
        }
    }
}

/// Errors aborting installation; steady-state fetch handling never errors
#[derive(Debug, Error)]
pub enum InstallError {
    /// A manifest entry could not be fetched
    #[error("failed to pre-cache {url}: {source}")]
    Precache {
        url: String,
        #[source]
        source: FetchError,
    },

    /// A manifest entry fetched with a non-200 status
    #[error("pre-cache of {url} returned HTTP {status}")]
    BadStatus { url: String, status: u16 },

    /// A fetched manifest entry could not be written to the static bucket
    #[error("failed to store pre-cached entry: {0}")]
    Store(#[from] io::Error),
}

/// The offline fetch gateway: classification, caching policy, and fallback
/// synthesis for every outbound request.
#[derive(Debug)]
pub struct FetchGateway<F: Fetcher> {
    fetcher: F,
    storage: CacheStorage,
    config: GatewayConfig,
}

impl<F: Fetcher> FetchGateway<F> {
    /// Creates a gateway over the given fetcher and cache storage
    pub fn new(fetcher: F, storage: CacheStorage, config: GatewayConfig) -> Self {
        Self {
            fetcher,
            storage,
            config,
        }
    }

    /// Whether a URL is classified as an API request
    pub fn is_api_request(&self, url: &str) -> bool {
        self.config.api_patterns.iter().any(|p| url.contains(p))
    }

    /// Pre-caches every manifest entry into the static bucket.
    ///
    /// Installation succeeds only if all entries fetch with HTTP 200 and
    /// store cleanly; any failure aborts it, and the caller must not
    /// activate. Entries are fetched concurrently.
    pub async fn install(&self) -> Result<(), InstallError> {
        let bucket = self.storage.open(&self.config.static_cache_name);

        let requests: Vec<FetchRequest> = self
            .config
            .precache_manifest
            .iter()
            .map(FetchRequest::get)
            .collect();
        let results = join_all(requests.iter().map(|req| self.fetcher.fetch(req))).await;

        for (request, result) in requests.iter().zip(results) {
            let response = result.map_err(|source| InstallError::Precache {
                url: request.url.clone(),
                source,
            })?;
            if !response.is_ok() {
                return Err(InstallError::BadStatus {
                    url: request.url.clone(),
                    status: response.status,
                });
            }
            bucket.put(request, &response)?;
        }

        info!(
            entries = self.config.precache_manifest.len(),
            bucket = %self.config.static_cache_name,
            "install complete"
        );
        Ok(())
    }

    /// Deletes every bucket whose name is not one of the two current bucket
    /// names, reclaiming caches from previous versions. Returns the number
    /// of buckets deleted.
    pub fn activate(&self) -> io::Result<usize> {
        let current = [
            self.config.static_cache_name.as_str(),
            self.config.api_cache_name.as_str(),
        ];

        let mut deleted = 0;
        for name in self.storage.bucket_names()? {
            if !current.contains(&name.as_str()) {
                self.storage.delete(&name)?;
                info!(bucket = %name, "deleted superseded cache bucket");
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// Handles an outbound request, applying the per-category policy.
    ///
    /// This never fails: every path, including total network and cache
    /// failure, produces a well-formed response.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> FetchResponse {
        if self.is_api_request(&request.url) {
            self.network_first(request).await
        } else {
            self.cache_first(request).await
        }
    }

    /// Network-first strategy for API requests
    async fn network_first(&self, request: &FetchRequest) -> FetchResponse {
        let bucket = self.storage.open(&self.config.api_cache_name);

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                // Only successful responses enter the cache; upstream HTTP
                // errors pass through to the caller uncached.
                if response.is_ok() {
                    if let Err(e) = bucket.put(request, &response) {
                        warn!(url = %request.url, error = %e, "failed to cache API response");
                    }
                }
                response
            }
            Err(e) => {
                debug!(url = %request.url, error = %e, "network fetch failed, consulting cache");
                match bucket.lookup(request) {
                    Some(cached) => cached.with_header(OFFLINE_HEADER, "true"),
                    None => Self::offline_json(),
                }
            }
        }
    }

    /// Cache-first strategy for static asset requests
    async fn cache_first(&self, request: &FetchRequest) -> FetchResponse {
        let bucket = self.storage.open(&self.config.static_cache_name);

        if let Some(cached) = bucket.lookup(request) {
            debug!(url = %request.url, "serving static asset from cache");
            return cached;
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_ok() {
                    if let Err(e) = bucket.put(request, &response) {
                        warn!(url = %request.url, error = %e, "failed to cache static asset");
                    }
                }
                response
            }
            Err(e) => {
                debug!(url = %request.url, error = %e, "static asset unavailable offline");
                if request.navigate {
                    Self::offline_page()
                } else {
                    Self::offline_text()
                }
            }
        }
    }

    /// Synthetic API response for offline-with-no-cached-entry.
    ///
    /// Returned as HTTP 200 so downstream JSON parsing never throws; the
    /// payload itself carries the error.
    fn offline_json() -> FetchResponse {
        let body = serde_json::json!({
            "error": true,
            "message": OFFLINE_NO_CACHE_MESSAGE,
            "offline": true,
        });
        FetchResponse::new(200, body.to_string().into_bytes())
            .with_header("Content-Type", "application/json")
            .with_header(OFFLINE_HEADER, "true")
    }

    /// Minimal offline page for failed navigation requests
    fn offline_page() -> FetchResponse {
        FetchResponse::new(200, OFFLINE_PAGE.as_bytes().to_vec())
            .with_header("Content-Type", "text/html; charset=utf-8")
            .with_header(OFFLINE_HEADER, "true")
    }

    /// Plain-text fallback for failed non-navigation static requests
    fn offline_text() -> FetchResponse {
        FetchResponse::new(503, OFFLINE_FALLBACK_TEXT.as_bytes().to_vec())
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_header(OFFLINE_HEADER, "true")
    }
}
