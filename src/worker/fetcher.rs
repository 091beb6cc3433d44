//! HTTP fetch seam for the offline gateway
//!
//! Defines the request/response types the gateway operates on and the
//! `Fetcher` trait that abstracts the network. Production code uses
//! `HttpFetcher` (reqwest); gateway tests substitute a scripted mock.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An outbound HTTP request as seen by the gateway.
///
/// Request identity for caching purposes is `method + URL`; see
/// [`FetchRequest::cache_key`]. The `navigate` flag marks document
/// navigations, which get an HTML offline fallback instead of plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// HTTP method, uppercase ("GET")
    pub method: String,
    /// Absolute request URL
    pub url: String,
    /// Whether this is a document navigation request
    pub navigate: bool,
}

impl FetchRequest {
    /// Creates a GET request for the given URL
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            navigate: false,
        }
    }

    /// Creates a GET navigation request (document load) for the given URL
    pub fn navigation(url: impl Into<String>) -> Self {
        Self {
            navigate: true,
            ..Self::get(url)
        }
    }

    /// Cache identity of this request: method plus URL
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

/// A complete HTTP response: status, headers, and body bytes.
///
/// Headers are kept as ordered name/value pairs so a cached response
/// round-trips byte-identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers in arrival order
    pub headers: Vec<(String, String)>,
    /// Raw response body
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Creates a response with the given status and body and no headers
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Appends a header, returning the modified response
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Looks up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the response carries HTTP 200
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Body interpreted as UTF-8, lossy
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Errors produced by a fetcher when the network is unreachable
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (offline, DNS, refused, timeout)
    #[error("network unreachable: {0}")]
    Network(String),
}

/// Abstraction over the network used by the gateway.
///
/// An implementation either yields a complete [`FetchResponse`] (including
/// upstream HTTP errors, which are responses, not fetch failures) or a
/// [`FetchError`] when no response could be obtained at all.
pub trait Fetcher: Send + Sync {
    /// Performs the request against the real network
    fn fetch(
        &self,
        request: &FetchRequest,
    ) -> impl std::future::Future<Output = Result<FetchResponse, FetchError>> + Send;
}

/// Production fetcher backed by a shared reqwest client
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a default reqwest client
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fetcher around an existing reqwest client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let response = self
            .client
            .request(method, &request.url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?
            .to_vec();

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_combines_method_and_url() {
        let req = FetchRequest::get("https://example.com/data");
        assert_eq!(req.cache_key(), "GET https://example.com/data");
    }

    #[test]
    fn test_navigation_request_sets_flag() {
        let req = FetchRequest::navigation("https://example.com/");
        assert!(req.navigate);
        assert_eq!(req.method, "GET");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let resp = FetchResponse::new(200, b"{}".to_vec())
            .with_header("Content-Type", "application/json");
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(resp.header("x-missing"), None);
    }

    #[test]
    fn test_with_header_appends_in_order() {
        let resp = FetchResponse::new(200, Vec::new())
            .with_header("a", "1")
            .with_header("b", "2");
        assert_eq!(resp.headers, vec![("a".into(), "1".into()), ("b".into(), "2".into())]);
    }

    #[test]
    fn test_is_ok_only_for_200() {
        assert!(FetchResponse::new(200, Vec::new()).is_ok());
        assert!(!FetchResponse::new(404, Vec::new()).is_ok());
        assert!(!FetchResponse::new(204, Vec::new()).is_ok());
    }

    #[test]
    fn test_response_roundtrips_through_json() {
        let resp = FetchResponse::new(200, b"hello".to_vec())
            .with_header("Content-Type", "text/plain");
        let json = serde_json::to_string(&resp).expect("serialize");
        let back: FetchResponse = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, resp);
    }
}
