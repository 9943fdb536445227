//! Namespace Module
//!
//! A key→entry registry scoped to one owner.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::cache::{canonical, CacheEntry, EntryMetadata};

// == Namespace ==
/// Key→entry registry for a single owner.
///
/// Keys are indexed in canonical (lowercase) form. Each entry lives in its own
/// DashMap slot, so every mutation below runs under that slot's shard write
/// guard and is indivisible to concurrent readers of the same entry.
#[derive(Debug, Default)]
pub struct Namespace {
    entries: DashMap<String, CacheEntry>,
}

impl Namespace {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == List ==
    /// Returns metadata for every entry that is not expired at `now`.
    ///
    /// The result is a snapshot ordered by creation time then key.
    pub fn list(&self, now: DateTime<Utc>) -> Vec<EntryMetadata> {
        let mut listing: Vec<EntryMetadata> = self
            .entries
            .iter()
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.metadata())
            .collect();

        listing.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.key.cmp(&b.key)));
        listing
    }

    // == Read ==
    /// Looks up a live entry, applies read side effects and projects it with `f`.
    ///
    /// Expired entries are left in place and reported as absent.
    fn read<R>(&self, key: &str, now: DateTime<Utc>, f: impl FnOnce(&CacheEntry) -> R) -> Option<R> {
        let mut entry = self.entries.get_mut(&canonical(key))?;

        if entry.is_expired(now) {
            return None;
        }

        entry.touch(now);
        Some(f(&*entry))
    }

    // == Get ==
    /// Retrieves a live entry, recording the read and renewing sliding expiry.
    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        self.read(key, now, CacheEntry::clone)
    }

    // == Get Metadata ==
    /// Same as [`get`](Self::get) without copying the value out.
    pub fn get_metadata(&self, key: &str, now: DateTime<Utc>) -> Option<EntryMetadata> {
        self.read(key, now, CacheEntry::metadata)
    }

    // == Exists ==
    /// Existence check with the same side effects as a read.
    pub fn exists(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.read(key, now, |_| ()).is_some()
    }

    // == Upsert ==
    /// Creates or overwrites the entry under `key`.
    ///
    /// Expiration state is not consulted: an expired entry is overwritten in
    /// place and becomes live again. `owner` and `key` are recorded as display
    /// labels only when the entry is created.
    #[allow(clippy::too_many_arguments)]
    pub fn upsert(
        &self,
        owner: &str,
        key: &str,
        value: String,
        content_type: Option<String>,
        expiry_length: Option<i32>,
        sliding_expiration: Option<bool>,
        now: DateTime<Utc>,
    ) -> EntryMetadata {
        let mut entry = self
            .entries
            .entry(canonical(key))
            .or_insert_with(|| CacheEntry::new(owner, key, now));

        entry.write(value, content_type, expiry_length, sliding_expiration, now);
        entry.metadata()
    }

    // == Update Expiry ==
    /// Replaces the expiry of a live entry.
    ///
    /// Returns `None` if the key is absent or already expired.
    pub fn update_expiry(
        &self,
        key: &str,
        expiry_length: Option<i32>,
        now: DateTime<Utc>,
    ) -> Option<EntryMetadata> {
        let mut entry = self.entries.get_mut(&canonical(key))?;

        if entry.is_expired(now) {
            return None;
        }

        entry.set_expiry(expiry_length, now);
        Some(entry.metadata())
    }

    // == Delete Key ==
    /// Removes the entry regardless of its expiration state.
    pub fn delete_key(&self, key: &str) -> bool {
        self.entries.remove(&canonical(key)).is_some()
    }

    // == Delete Prefix ==
    /// Removes every entry whose canonical key starts with `prefix`.
    ///
    /// Matching keys are collected first, then removed, so removals cannot
    /// disturb the scan. Returns the number of entries actually removed.
    pub fn delete_prefix(&self, prefix: &str) -> usize {
        let prefix = canonical(prefix);

        let matching: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(&prefix))
            .map(|entry| entry.key().clone())
            .collect();

        matching
            .iter()
            .filter(|key| self.entries.remove(key.as_str()).is_some())
            .count()
    }

    // == Length ==
    /// Number of entries held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
