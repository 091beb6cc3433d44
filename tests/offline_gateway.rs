//! Integration tests for the offline fetch gateway
//!
//! Exercises the full install/activate/fetch lifecycle over real cache
//! directories: pre-caching, network-first and cache-first strategies,
//! offline fallbacks, and garbage collection of superseded buckets.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use skycast::worker::{
    CacheStorage, FetchError, FetchGateway, FetchRequest, FetchResponse, Fetcher, GatewayConfig,
    API_CACHE_NAME, APP_SHELL_PATHS, OFFLINE_HEADER, STATIC_CACHE_NAME,
};

const ORIGIN: &str = "https://weather.example.com";

#[derive(Default)]
struct ScriptState {
    responses: HashMap<String, FetchResponse>,
    offline: bool,
    calls: Vec<String>,
}

/// Scripted fetcher; clones share state so a handle kept outside the
/// gateway can flip it offline mid-test.
#[derive(Clone, Default)]
struct ScriptedFetcher {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedFetcher {
    fn new() -> Self {
        Self::default()
    }

    fn respond(&self, url: impl Into<String>, response: FetchResponse) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(url.into(), response);
    }

    fn respond_ok(&self, url: &str, body: &str) {
        self.respond(url, FetchResponse::new(200, body.as_bytes().to_vec()));
    }

    fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(request.url.clone());
        if state.offline {
            return Err(FetchError::Network("connection refused".to_string()));
        }
        state
            .responses
            .get(&request.url)
            .cloned()
            .ok_or_else(|| FetchError::Network(format!("no route to {}", request.url)))
    }
}

fn shell_gateway() -> (FetchGateway<ScriptedFetcher>, ScriptedFetcher, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let fetcher = ScriptedFetcher::new();
    let storage = CacheStorage::with_dir(temp_dir.path().to_path_buf());
    let gateway = FetchGateway::new(
        fetcher.clone(),
        storage,
        GatewayConfig::with_shell_origin(ORIGIN),
    );
    (gateway, fetcher, temp_dir)
}

fn script_full_shell(fetcher: &ScriptedFetcher) {
    for path in APP_SHELL_PATHS {
        fetcher.respond_ok(&format!("{ORIGIN}{path}"), &format!("asset:{path}"));
    }
}

const ONECALL_URL: &str = "https://api.openweathermap.org/data/3.0/onecall?lat=1&lon=2&appid=k";

#[tokio::test]
async fn test_install_precaches_entire_manifest() {
    let (gateway, fetcher, _tmp) = shell_gateway();
    script_full_shell(&fetcher);

    gateway.install().await.expect("install should succeed");

    let mut fetched = fetcher.calls();
    fetched.sort();
    let mut expected: Vec<String> = APP_SHELL_PATHS
        .iter()
        .map(|p| format!("{ORIGIN}{p}"))
        .collect();
    expected.sort();
    assert_eq!(fetched, expected, "install fetches exactly the manifest");
}

#[tokio::test]
async fn test_precached_assets_served_without_network() {
    let (gateway, fetcher, _tmp) = shell_gateway();
    script_full_shell(&fetcher);
    gateway.install().await.expect("install should succeed");
    fetcher.clear_calls();

    let response = gateway
        .handle_fetch(&FetchRequest::get(format!("{ORIGIN}/styles.css")))
        .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body_text(), "asset:/styles.css");
    assert!(
        fetcher.calls().is_empty(),
        "cache-first hit must not touch the network"
    );
}

#[tokio::test]
async fn test_install_aborts_on_any_failed_entry() {
    let (gateway, fetcher, _tmp) = shell_gateway();
    script_full_shell(&fetcher);
    // One manifest entry answers 404
    fetcher.respond(
        format!("{ORIGIN}/main.js"),
        FetchResponse::new(404, Vec::new()),
    );

    assert!(gateway.install().await.is_err(), "partial install must fail");
}

#[tokio::test]
async fn test_api_response_cached_and_replayed_byte_identical() {
    let (gateway, fetcher, _tmp) = shell_gateway();
    let body = r#"{"current":{"temp":18.4},"daily":[]}"#;
    fetcher.respond_ok(ONECALL_URL, body);

    let live = gateway.handle_fetch(&FetchRequest::get(ONECALL_URL)).await;
    assert_eq!(live.status, 200);
    assert!(live.header(OFFLINE_HEADER).is_none());

    fetcher.set_offline(true);
    let cached = gateway.handle_fetch(&FetchRequest::get(ONECALL_URL)).await;

    assert_eq!(cached.status, 200);
    assert_eq!(cached.header(OFFLINE_HEADER), Some("true"));
    assert_eq!(
        cached.body, live.body,
        "cached replay must be byte-identical to the stored response"
    );
}

#[tokio::test]
async fn test_api_offline_without_cache_synthesizes_json() {
    let (gateway, fetcher, _tmp) = shell_gateway();
    fetcher.set_offline(true);

    let response = gateway.handle_fetch(&FetchRequest::get(ONECALL_URL)).await;

    assert_eq!(response.status, 200, "fallback parses cleanly downstream");
    assert_eq!(response.header(OFFLINE_HEADER), Some("true"));
    let value: serde_json::Value =
        serde_json::from_slice(&response.body).expect("fallback must be valid JSON");
    assert_eq!(value["error"], true);
    assert_eq!(value["offline"], true);
    assert_eq!(value["message"], "offline and not cached");
}

#[tokio::test]
async fn test_api_http_error_passes_through_uncached() {
    let (gateway, fetcher, _tmp) = shell_gateway();
    fetcher.respond(ONECALL_URL, FetchResponse::new(401, b"unauthorized".to_vec()));

    let response = gateway.handle_fetch(&FetchRequest::get(ONECALL_URL)).await;
    assert_eq!(response.status, 401);

    // The failure was not cached, so offline now yields the synthetic payload
    fetcher.set_offline(true);
    let offline = gateway.handle_fetch(&FetchRequest::get(ONECALL_URL)).await;
    assert_eq!(offline.status, 200);
    let value: serde_json::Value = serde_json::from_slice(&offline.body).unwrap();
    assert_eq!(value["offline"], true);
}

#[tokio::test]
async fn test_navigation_double_failure_serves_offline_page() {
    let (gateway, fetcher, _tmp) = shell_gateway();
    fetcher.set_offline(true);

    let response = gateway
        .handle_fetch(&FetchRequest::navigation(format!("{ORIGIN}/dashboard")))
        .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.header(OFFLINE_HEADER), Some("true"));
    assert!(
        response
            .header("Content-Type")
            .is_some_and(|ct| ct.starts_with("text/html")),
        "navigation fallback is HTML"
    );
    assert!(response.body_text().contains("You are offline."));
}

#[tokio::test]
async fn test_plain_asset_double_failure_serves_text_fallback() {
    let (gateway, fetcher, _tmp) = shell_gateway();
    fetcher.set_offline(true);

    let response = gateway
        .handle_fetch(&FetchRequest::get(format!("{ORIGIN}/missing.css")))
        .await;

    assert_eq!(response.status, 503);
    assert_eq!(response.body_text(), "Offline content not available.");
}

#[tokio::test]
async fn test_activate_deletes_only_superseded_buckets() {
    let temp_dir = TempDir::new().expect("temp dir");
    let storage = CacheStorage::with_dir(temp_dir.path().to_path_buf());

    // Seed an entry in each of: old static bucket, current static
    // bucket, current API bucket
    let request = FetchRequest::get("https://weather.example.com/index.html");
    let response = FetchResponse::new(200, b"shell".to_vec());
    for name in ["weather-app-cache-v0", STATIC_CACHE_NAME, API_CACHE_NAME] {
        storage
            .open(name)
            .put(&request, &response)
            .expect("seed bucket");
    }

    let gateway = FetchGateway::new(
        ScriptedFetcher::new(),
        storage,
        GatewayConfig::default(),
    );
    let deleted = gateway.activate().expect("activate should succeed");

    assert_eq!(deleted, 1, "only the v0 bucket is superseded");
    let remaining = CacheStorage::with_dir(temp_dir.path().to_path_buf())
        .bucket_names()
        .expect("list buckets");
    assert_eq!(remaining, vec![API_CACHE_NAME, STATIC_CACHE_NAME]);
}

#[tokio::test]
async fn test_static_miss_fetches_then_caches() {
    let (gateway, fetcher, _tmp) = shell_gateway();
    let url = format!("{ORIGIN}/late-asset.js");
    fetcher.respond_ok(&url, "lazy");

    let first = gateway.handle_fetch(&FetchRequest::get(&url)).await;
    assert_eq!(first.body_text(), "lazy");

    fetcher.set_offline(true);
    let second = gateway.handle_fetch(&FetchRequest::get(&url)).await;
    assert_eq!(second.status, 200);
    assert_eq!(second.body_text(), "lazy", "runtime-cached asset survives offline");
}
