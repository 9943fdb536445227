//! Request context for the cache server API
//!
//! Every operation on `/api/data` is addressed through `x-httpcache-*`
//! headers. This module extracts and validates them before any handler
//! touches the store.

use std::time::Duration;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::error::{CacheError, Result};
use crate::fetch::FetchRequest;

// == Header Names ==
pub const OWNER_HEADER: &str = "x-httpcache-owner";
pub const KEY_HEADER: &str = "x-httpcache-key";
pub const EXPIRY_LENGTH_HEADER: &str = "x-httpcache-expiry-length";
pub const SLIDING_EXPIRATION_HEADER: &str = "x-httpcache-sliding-expiration";
pub const KEY_IS_PREFIX_HEADER: &str = "x-httpcache-key-is-prefix";
pub const RETURN_ONLY_DATA_HEADER: &str = "x-httpcache-return-only-data";
pub const METADATA_ONLY_HEADER: &str = "x-httpcache-metadata-only";
pub const CONTENT_TYPE_HEADER: &str = "x-httpcache-content-type";
pub const URL_HEADER: &str = "x-httpcache-url";
pub const URL_METHOD_HEADER: &str = "x-httpcache-url-method";
pub const URL_TIMEOUT_HEADER: &str = "x-httpcache-url-timeout";

/// Method used for URL fetches when none is given.
pub const DEFAULT_FETCH_METHOD: &str = "GET";

// == Request Context ==
/// Validated operation parameters for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    /// Owner as supplied (non-blank)
    pub owner: String,
    /// Key as supplied; `None` when the header is absent
    pub key: Option<String>,
    /// Expiry length in seconds, `-1` clears
    pub expiry_length: Option<i32>,
    pub sliding_expiration: Option<bool>,
    pub key_is_prefix: bool,
    pub return_only_data: bool,
    pub metadata_only: bool,
    pub content_type: Option<String>,
    pub url: Option<String>,
    pub url_method: Option<String>,
    pub url_timeout_ms: Option<u64>,
}

impl RequestContext {
    /// Builds a context from request headers.
    ///
    /// # Errors
    /// `InvalidRequest` for a missing or blank owner, a present but blank key
    /// and malformed numeric or boolean values.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        let owner = header(headers, OWNER_HEADER)?
            .filter(|owner| !owner.trim().is_empty())
            .ok_or_else(|| {
                CacheError::InvalidRequest(format!("Header '{}' is required.", OWNER_HEADER))
            })?;

        let key = header(headers, KEY_HEADER)?;
        if let Some(key) = &key {
            if key.trim().is_empty() {
                return Err(CacheError::InvalidRequest(format!(
                    "Header '{}' cannot be empty.",
                    KEY_HEADER
                )));
            }
        }

        let expiry_length = header(headers, EXPIRY_LENGTH_HEADER)?
            .map(|raw| parse_expiry_length(&raw))
            .transpose()?;

        let sliding_expiration = header(headers, SLIDING_EXPIRATION_HEADER)?
            .map(|raw| {
                raw.trim().to_ascii_lowercase().parse::<bool>().map_err(|_| {
                    CacheError::InvalidRequest(format!(
                        "Header '{}' is a boolean value.",
                        SLIDING_EXPIRATION_HEADER
                    ))
                })
            })
            .transpose()?;

        let url_timeout_ms = header(headers, URL_TIMEOUT_HEADER)?
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|_| {
                    CacheError::InvalidRequest(format!(
                        "Header '{}' is a number of milliseconds for timeout.",
                        URL_TIMEOUT_HEADER
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            owner,
            key,
            expiry_length,
            sliding_expiration,
            key_is_prefix: headers.contains_key(KEY_IS_PREFIX_HEADER),
            return_only_data: headers.contains_key(RETURN_ONLY_DATA_HEADER),
            metadata_only: headers.contains_key(METADATA_ONLY_HEADER),
            content_type: header(headers, CONTENT_TYPE_HEADER)?,
            url: header(headers, URL_HEADER)?.filter(|url| !url.trim().is_empty()),
            url_method: header(headers, URL_METHOD_HEADER)?,
            url_timeout_ms,
        })
    }

    /// Returns the key, or `InvalidRequest` if the header was absent.
    pub fn require_key(&self) -> Result<&str> {
        self.key.as_deref().ok_or_else(|| {
            CacheError::InvalidRequest(format!("Header '{}' is required.", KEY_HEADER))
        })
    }

    /// Describes the URL fetch requested, if any.
    ///
    /// `default_timeout` applies when no timeout header was sent.
    pub fn fetch_request(&self, default_timeout: Duration) -> Option<FetchRequest> {
        let url = self.url.clone()?;

        Some(FetchRequest {
            url,
            method: self
                .url_method
                .as_deref()
                .filter(|method| !method.trim().is_empty())
                .unwrap_or(DEFAULT_FETCH_METHOD)
                .trim()
                .to_uppercase(),
            timeout: self
                .url_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(default_timeout),
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = CacheError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}

// == Helpers ==
fn header(headers: &HeaderMap, name: &str) -> Result<Option<String>> {
    headers
        .get(name)
        .map(|value| {
            value.to_str().map(str::to_string).map_err(|_| {
                CacheError::InvalidRequest(format!("Header '{}' must be visible ASCII.", name))
            })
        })
        .transpose()
}

/// Any `i32` is accepted. Negative lengths other than `-1` give a deadline
/// that has already passed.
fn parse_expiry_length(raw: &str) -> Result<i32> {
    raw.trim().parse::<i32>().map_err(|_| {
        CacheError::InvalidRequest(format!(
            "Header '{}' is the number of seconds to keep data, or -1 to never expire.",
            EXPIRY_LENGTH_HEADER
        ))
    })
}
