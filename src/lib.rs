//! HttpCache - An ephemeral HTTP key-value cache
//!
//! Stores opaque text payloads under an owner/key namespace with optional
//! absolute or sliding expiration, checked lazily on access.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;

pub use api::AppState;
pub use cache::Store;
pub use config::Config;
