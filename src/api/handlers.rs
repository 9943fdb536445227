//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. Handlers translate a
//! [`RequestContext`] into store operations; no store guard is ever held
//! across an `.await`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{debug, info};

use crate::cache::{EntryMetadata, Store};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::fetch::{ContentFetcher, HttpFetcher};
use crate::models::{EntryResponse, HealthResponse, MessageResponse, RequestContext, StatsResponse};

/// Application state shared across all handlers.
///
/// The store is created once at startup; nothing is initialized lazily.
#[derive(Clone)]
pub struct AppState {
    /// Owner→namespace registry
    pub store: Arc<Store>,
    /// Source for bodies supplied by URL
    pub fetcher: Arc<dyn ContentFetcher>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(store: Store, fetcher: Arc<dyn ContentFetcher>, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            fetcher,
            config: Arc::new(config),
        }
    }

    /// Creates a new AppState with an empty store and an HTTP fetcher.
    pub fn from_config(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.max_body_bytes)?;
        Ok(Self::new(Store::new(), Arc::new(fetcher), config))
    }
}

fn owner_not_found() -> CacheError {
    CacheError::NotFound("Owner not found.".to_string())
}

fn key_not_found() -> CacheError {
    CacheError::NotFound("Key not found.".to_string())
}

/// Handler for GET /api/data
///
/// Lists the owner's live entries when no key is given, otherwise returns a
/// single entry as JSON, as metadata only, or as the raw value.
pub async fn get_handler(State(state): State<AppState>, ctx: RequestContext) -> Result<Response> {
    let now = Utc::now();
    let namespace = state.store.namespace(&ctx.owner).ok_or_else(owner_not_found)?;

    let Some(key) = ctx.key.as_deref() else {
        return Ok(Json(namespace.list(now)).into_response());
    };

    if ctx.metadata_only {
        let metadata = namespace.get_metadata(key, now).ok_or_else(key_not_found)?;
        return Ok(Json(metadata).into_response());
    }

    let entry = namespace.get(key, now).ok_or_else(key_not_found)?;

    if ctx.return_only_data {
        return Ok(([(header::CONTENT_TYPE, entry.content_type)], entry.value).into_response());
    }

    Ok(Json(EntryResponse::from(entry)).into_response())
}

/// Handler for HEAD /api/data
///
/// Existence check; counts as a read for sliding expiration.
pub async fn exists_handler(State(state): State<AppState>, ctx: RequestContext) -> Result<StatusCode> {
    let key = ctx.require_key()?;
    let namespace = state.store.namespace(&ctx.owner).ok_or_else(owner_not_found)?;

    if namespace.exists(key, Utc::now()) {
        Ok(StatusCode::OK)
    } else {
        Err(key_not_found())
    }
}

/// Handler for POST /api/data
///
/// Stores the request body, or the body fetched from `x-httpcache-url`,
/// creating the owner's namespace if needed.
pub async fn set_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: String,
) -> Result<Json<EntryMetadata>> {
    let key = ctx.require_key()?;

    let (body, fetched_content_type) = match ctx.fetch_request(state.config.fetch_timeout()) {
        Some(request) => {
            let fetched = state.fetcher.fetch(&request).await?;
            debug!("Fetched {} bytes from {}", fetched.body.len(), request.url);
            (fetched.body, fetched.content_type)
        }
        None => (body, None),
    };

    if body.trim().is_empty() {
        return Err(CacheError::InvalidRequest(
            "Request body is empty. If you meant to delete the entry, use the DELETE HTTP method."
                .to_string(),
        ));
    }

    let content_type = fetched_content_type.or_else(|| ctx.content_type.clone());

    let metadata = state.store.namespace_or_create(&ctx.owner).upsert(
        &ctx.owner,
        key,
        body,
        content_type,
        ctx.expiry_length,
        ctx.sliding_expiration,
        Utc::now(),
    );

    debug!("Set {}/{} ({} bytes)", ctx.owner, key, metadata.size);
    Ok(Json(metadata))
}

/// Handler for PUT /api/data
///
/// Replaces the expiry of a live entry.
pub async fn update_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<EntryMetadata>> {
    let key = ctx.require_key()?;
    let namespace = state.store.namespace(&ctx.owner).ok_or_else(owner_not_found)?;

    let metadata = namespace
        .update_expiry(key, ctx.expiry_length, Utc::now())
        .ok_or_else(key_not_found)?;

    Ok(Json(metadata))
}

/// Handler for DELETE /api/data
///
/// Deletes one key, or every key sharing a prefix when
/// `x-httpcache-key-is-prefix` is present. An emptied namespace is dropped.
pub async fn delete_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<MessageResponse>> {
    let key = ctx.require_key()?;

    let response = {
        let namespace = state.store.namespace(&ctx.owner).ok_or_else(owner_not_found)?;

        if ctx.key_is_prefix {
            let count = namespace.delete_prefix(key);
            info!("Removed {} entries with prefix '{}' for {}", count, key, ctx.owner);
            MessageResponse::entries_removed(count)
        } else if namespace.delete_key(key) {
            MessageResponse::entry_removed()
        } else {
            return Err(key_not_found());
        }
    };

    if state.store.remove_if_empty(&ctx.owner) {
        debug!("Namespace for {} is empty, removed", ctx.owner);
    }

    Ok(Json(response))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.store.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
