//! Request and Response models for the cache server API
//!
//! `context` turns `x-httpcache-*` headers into validated operation
//! parameters; `responses` holds the JSON bodies sent back.

pub mod context;
pub mod responses;

// Re-export commonly used types
pub use context::RequestContext;
pub use responses::{
    EntryResponse, ErrorResponse, HealthResponse, MessageResponse, StatsResponse,
};
