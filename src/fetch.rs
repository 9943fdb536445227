//! Content Fetcher
//!
//! Retrieves an entry body from an external URL on behalf of a Set request.
//! The cache core only ever sees the resulting text and content type.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Method};
use tracing::debug;

use crate::error::{CacheError, Result};

/// User agent sent with every outbound fetch.
pub const USER_AGENT: &str = "httpcache data fetcher";

// == Fetch Request ==
/// Where and how to fetch a body.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub url: String,
    /// HTTP method, uppercased before use
    pub method: String,
    pub timeout: Duration,
}

// == Fetched Content ==
/// Body text and the content type the remote server declared, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedContent {
    pub body: String,
    pub content_type: Option<String>,
}

// == Content Fetcher Trait ==
/// Source of entry bodies fetched from URLs.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetches the body. Every failure is reported as [`CacheError::Fetch`].
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedContent>;
}

// == HTTP Fetcher ==
/// [`ContentFetcher`] backed by a shared `reqwest` client.
///
/// Fetched bodies are held to the same byte limit as request bodies.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(max_body_bytes: usize) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CacheError::Internal(format!("Could not build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_body_bytes,
        })
    }

    fn too_large(&self) -> CacheError {
        CacheError::Fetch(format!(
            "Response body exceeds maximum length of {} bytes",
            self.max_body_bytes
        ))
    }
}

fn fetch_error(error: reqwest::Error) -> CacheError {
    CacheError::Fetch(error.to_string())
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedContent> {
        let method = Method::from_bytes(request.method.to_uppercase().as_bytes())
            .map_err(|_| CacheError::Fetch(format!("Invalid HTTP method: {}", request.method)))?;

        debug!("Fetching {} {} (timeout {:?})", method, request.url, request.timeout);

        let mut response = self
            .client
            .request(method, &request.url)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(fetch_error)?
            .error_for_status()
            .map_err(fetch_error)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if response
            .content_length()
            .is_some_and(|length| length > self.max_body_bytes as u64)
        {
            return Err(self.too_large());
        }

        // Content-Length can be missing or understated
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(fetch_error)? {
            if bytes.len() + chunk.len() > self.max_body_bytes {
                return Err(self.too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        let body = String::from_utf8_lossy(&bytes).into_owned();
        Ok(FetchedContent { body, content_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};

    fn request(url: &str, method: &str) -> FetchRequest {
        FetchRequest {
            url: url.to_string(),
            method: method.to_string(),
            timeout: Duration::from_millis(500),
        }
    }

    #[tokio::test]
    async fn test_invalid_url_is_fetch_error() {
        let fetcher = HttpFetcher::new(1024).unwrap();

        let result = fetcher.fetch(&request("not a url", "GET")).await;
        assert!(matches!(result, Err(CacheError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_invalid_method_is_fetch_error() {
        let fetcher = HttpFetcher::new(1024).unwrap();

        let result = fetcher.fetch(&request("http://127.0.0.1/", "BAD METHOD")).await;
        assert!(matches!(result, Err(CacheError::Fetch(_))));
    }

    async fn serve_body(body: &'static str) -> String {
        let app = Router::new().route("/body", get(move || async move { body }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/body", addr)
    }

    #[tokio::test]
    async fn test_body_within_limit() {
        let url = serve_body("0123456789").await;
        let fetcher = HttpFetcher::new(10).unwrap();

        let content = fetcher.fetch(&request(&url, "get")).await.unwrap();
        assert_eq!(content.body, "0123456789");
        assert_eq!(content.content_type.as_deref(), Some("text/plain; charset=utf-8"));
    }

    #[tokio::test]
    async fn test_body_over_limit_is_fetch_error() {
        let url = serve_body("0123456789a").await;
        let fetcher = HttpFetcher::new(10).unwrap();

        let result = fetcher.fetch(&request(&url, "GET")).await;
        assert!(matches!(result, Err(CacheError::Fetch(_))));
    }
}
