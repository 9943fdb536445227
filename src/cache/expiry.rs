//! Expiration Policy Module
//!
//! Pure evaluation of entry expiration and sliding renewal.

use chrono::{DateTime, Duration, Utc};

use crate::cache::CacheEntry;

/// Expiry length sentinel that clears any expiration on write.
pub const CLEAR_EXPIRY: i32 = -1;

// == Normalize ==
/// Maps the clearing sentinel to "never expires".
pub fn normalize(expiry_length: Option<i32>) -> Option<i32> {
    expiry_length.filter(|&seconds| seconds != CLEAR_EXPIRY)
}

// == Deadline ==
/// Computes the absolute deadline `from + expiry_length` seconds.
///
/// Returns `None` when the entry never expires.
pub fn deadline(expiry_length: Option<i32>, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    expiry_length.map(|seconds| from + Duration::seconds(i64::from(seconds)))
}

// == Is Expired ==
/// Checks whether the entry is expired at `now`.
///
/// An entry is still live at exactly its deadline and expired strictly after it.
pub fn is_expired(entry: &CacheEntry, now: DateTime<Utc>) -> bool {
    match entry.expires {
        Some(expires) => expires < now,
        None => false,
    }
}

// == Sliding Renewal ==
/// Pushes the deadline to `now + expiry_length` for sliding entries.
///
/// Only reads call this; writes recompute the deadline themselves.
pub fn apply_sliding_renewal(entry: &mut CacheEntry, now: DateTime<Utc>) {
    if entry.sliding_expiration && entry.expiry_length.is_some() {
        entry.expires = deadline(entry.expiry_length, now);
    }
}
