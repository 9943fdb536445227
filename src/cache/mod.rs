//! Cache Module
//!
//! In-memory owner→key→entry storage with lazy absolute and sliding expiration.
//!
//! Expired entries are never swept in the background; they are reported as
//! absent on access and reclaimed only by an explicit delete. Unbounded owner
//! or key churn without deletes therefore grows memory indefinitely.

mod entry;
pub mod expiry;
mod namespace;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, EntryMetadata};
pub use namespace::Namespace;
pub use stats::StoreStats;
pub use store::{NamespaceRef, Store};

// == Public Constants ==
/// Content type recorded when a write supplies none
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

// == Canonical Form ==
/// Normalizes an owner or key label for indexing.
///
/// Every lookup, write and delete path goes through this.
pub fn canonical(label: &str) -> String {
    label.to_lowercase()
}
