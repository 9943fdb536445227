//! Cache Entry Module
//!
//! Defines a single cached value together with its metadata and expiration state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{expiry, DEFAULT_CONTENT_TYPE};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// An entry is owned by exactly one namespace slot. `owner` and `key` keep the
/// casing supplied on first insert; the namespace indexes the lowercased form.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Owner label as first supplied
    pub owner: String,
    /// Key label as first supplied
    pub key: String,
    /// Set once at construction
    pub created: DateTime<Utc>,
    /// Set on every successful write
    pub updated: DateTime<Utc>,
    /// Set on every successful read or existence check
    pub last_read: Option<DateTime<Utc>>,
    /// Absolute deadline, None = never expires
    pub expires: Option<DateTime<Utc>>,
    /// Seconds until expiry, None = never expires
    pub expiry_length: Option<i32>,
    /// Whether reads push the deadline forward
    pub sliding_expiration: bool,
    /// The stored payload
    pub value: String,
    /// How to interpret `value`
    pub content_type: String,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an empty entry stamped with `now`.
    ///
    /// The entry carries no value until the first [`write`](Self::write).
    pub fn new(owner: impl Into<String>, key: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            owner: owner.into(),
            key: key.into(),
            created: now,
            updated: now,
            last_read: None,
            expires: None,
            expiry_length: None,
            sliding_expiration: false,
            value: String::new(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    // == Write ==
    /// Replaces value, content type and expiration in one step.
    ///
    /// `sliding_expiration` is only replaced when supplied. A blank or missing
    /// content type falls back to `text/plain`.
    pub fn write(
        &mut self,
        value: String,
        content_type: Option<String>,
        expiry_length: Option<i32>,
        sliding_expiration: Option<bool>,
        now: DateTime<Utc>,
    ) {
        self.value = value;
        self.content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        if let Some(sliding) = sliding_expiration {
            self.sliding_expiration = sliding;
        }

        self.set_expiry(expiry_length, now);
    }

    // == Set Expiry ==
    /// Replaces the expiry length and recomputes the deadline from `now`.
    pub fn set_expiry(&mut self, expiry_length: Option<i32>, now: DateTime<Utc>) {
        self.updated = now;
        self.expiry_length = expiry::normalize(expiry_length);
        self.expires = expiry::deadline(self.expiry_length, now);
    }

    // == Touch ==
    /// Applies the side effects of a successful read.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_read = Some(now);
        expiry::apply_sliding_renewal(self, now);
    }

    // == Is Expired ==
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        expiry::is_expired(self, now)
    }

    // == Size ==
    /// Byte length of the stored value.
    pub fn size(&self) -> usize {
        self.value.len()
    }

    // == Metadata ==
    /// Returns every field except the value itself.
    pub fn metadata(&self) -> EntryMetadata {
        EntryMetadata {
            created: self.created,
            updated: self.updated,
            last_read: self.last_read,
            expires: self.expires,
            expiry_length: self.expiry_length,
            sliding_expiration: self.sliding_expiration,
            size: self.size(),
            owner: self.owner.clone(),
            key: self.key.clone(),
            content_type: self.content_type.clone(),
        }
    }
}

// == Entry Metadata ==
/// Snapshot of an entry's metadata, as returned by listings and writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetadata {
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub last_read: Option<DateTime<Utc>>,
    pub expires: Option<DateTime<Utc>>,
    pub expiry_length: Option<i32>,
    pub sliding_expiration: bool,
    pub size: usize,
    pub owner: String,
    pub key: String,
    pub content_type: String,
}
