//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheEntry, EntryMetadata, StoreStats};

/// Response body for a single-entry GET: metadata plus the value.
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    #[serde(flatten)]
    pub metadata: EntryMetadata,
    /// The stored value
    pub value: String,
}

impl From<CacheEntry> for EntryResponse {
    fn from(entry: CacheEntry) -> Self {
        Self {
            metadata: entry.metadata(),
            value: entry.value,
        }
    }
}

/// Response body for DELETE
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Confirmation for a single-key delete
    pub fn entry_removed() -> Self {
        Self::new("Entry removed.")
    }

    /// Confirmation for a prefix delete
    pub fn entries_removed(count: usize) -> Self {
        Self::new(format!("{} entries removed.", count))
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Owners currently holding a namespace
    pub owners: usize,
    /// Entries in memory, expired ones included
    pub entries: usize,
    pub entries_per_owner: f64,
}

impl From<StoreStats> for StatsResponse {
    fn from(stats: StoreStats) -> Self {
        Self {
            owners: stats.owners,
            entries: stats.entries,
            entries_per_owner: stats.entries_per_owner(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
