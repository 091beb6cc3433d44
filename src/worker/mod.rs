//! Offline fetch gateway
//!
//! All outbound HTTP traffic flows through this module. It classifies each
//! request as an API call or a static asset, applies a network-first or
//! cache-first strategy against disk-backed cache buckets, and synthesizes
//! well-formed fallback responses when offline. Installation pre-caches the
//! app shell; activation garbage collects superseded cache buckets.

mod cache;
mod fetcher;
mod gateway;

pub use cache::{CacheBucket, CacheStorage};
pub use fetcher::{FetchError, FetchRequest, FetchResponse, Fetcher, HttpFetcher};
pub use gateway::{
    FetchGateway, GatewayConfig, InstallError, API_CACHE_NAME, API_URL_PATTERNS, APP_SHELL_PATHS,
    OFFLINE_HEADER, STATIC_CACHE_NAME,
};

#[cfg(test)]
pub(crate) use fetcher::mock;
