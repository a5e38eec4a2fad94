//! Memory Store Module
//!
//! The memory tier: a keyed map with group tags, TTL expiry and
//! size-bounded eviction ordered by insertion time.
//!
//! The store itself is synchronous; callers wrap it in a reader-writer lock
//! and the background sweeper drives `purge_expired` and
//! `evict_to_capacity`.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use tracing::debug;

use crate::models::{KeyValue, StorageRow};
use crate::storage::entry::{IndexKey, MemEntry};

// == Memory Store ==
/// In-memory tier with byte-exact usage accounting.
///
/// Two structures stay in lockstep: the main map and an ordering index
/// sorted by insertion time. Every key in the map owns exactly one index
/// slot, and the running `usage` equals the sum of the charged bytes of all
/// live entries. Eviction is FIFO on insertion time; reads do not reorder.
#[derive(Debug)]
pub struct MemoryStore {
    /// Key-value storage
    entries: HashMap<String, MemEntry>,
    /// Eviction ordering index: insertion instant -> key, oldest first
    index: BTreeMap<IndexKey, String>,
    /// Running sum of charged bytes over live entries
    usage: usize,
    /// Usage bound enforced by eviction
    max_bytes: usize,
    /// Sequence counter breaking insertion-instant ties in the index
    seq: u64,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store bounded to `max_bytes` of charged usage.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            index: BTreeMap::new(),
            usage: 0,
            max_bytes,
            seq: 0,
        }
    }

    // == Set ==
    /// Stores a key-value pair with a group tag and optional TTL.
    ///
    /// An existing entry under the same key is destroyed first: its charged
    /// bytes are subtracted and its index slot removed before the new entry
    /// is inserted with a fresh insertion time. A `ttl_seconds` of zero or
    /// less means the entry never expires.
    ///
    /// The usage bound is not enforced here; a set may push `usage` past
    /// `max_bytes` until the next eviction pass.
    pub fn set(&mut self, key: String, value: String, group: String, ttl_seconds: i64) -> bool {
        let now = Instant::now();

        if let Some((old_key, old)) = self.entries.remove_entry(&key) {
            self.usage -= old.charged_bytes(&old_key);
            self.index.remove(&old.index_key);
            debug!(key = %key, "overwriting existing key");
        }

        self.seq += 1;
        let entry = MemEntry::new(value, group, ttl_seconds, now, self.seq);
        self.index.insert(entry.index_key, key.clone());
        self.usage += entry.charged_bytes(&key);
        self.entries.insert(key, entry);

        true
    }

    // == Get ==
    /// Returns the value stored under `key`, or the empty string when the
    /// key is absent or expired.
    ///
    /// An expired entry is not removed here; the sweeper reclaims it.
    pub fn get(&self, key: &str) -> String {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => entry.value.clone(),
            _ => String::new(),
        }
    }

    // == Get Group ==
    /// Returns every live (key, value) pair tagged with `group`.
    /// Order is unspecified.
    pub fn get_group(&self, group: &str) -> Vec<KeyValue> {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|(_, entry)| entry.group == group && !entry.is_expired(now))
            .map(|(key, entry)| KeyValue {
                key: key.clone(),
                value: entry.value.clone(),
            })
            .collect()
    }

    // == Delete ==
    /// Removes the entry under `key`. Returns 1 if an entry was removed,
    /// 0 otherwise.
    pub fn delete(&mut self, key: &str) -> u64 {
        match self.entries.remove_entry(key) {
            Some((old_key, old)) => {
                self.usage -= old.charged_bytes(&old_key);
                self.index.remove(&old.index_key);
                1
            }
            None => 0,
        }
    }

    // == Delete Group ==
    /// Removes every entry tagged with `group` in one pass over the map,
    /// maintaining usage and the ordering index incrementally. Returns the
    /// number of entries removed.
    pub fn delete_group(&mut self, group: &str) -> u64 {
        let Self {
            entries,
            index,
            usage,
            ..
        } = self;

        let mut removed = 0;
        entries.retain(|key, entry| {
            if entry.group == group {
                *usage -= entry.charged_bytes(key);
                index.remove(&entry.index_key);
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    // == List ==
    /// Returns a snapshot of every live entry. Order is unspecified.
    pub fn list(&self) -> Vec<StorageRow> {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(key, entry)| StorageRow {
                key: key.clone(),
                value: entry.value.clone(),
                group: entry.group.clone(),
            })
            .collect()
    }

    // == Purge Expired ==
    /// Removes every expired entry. Returns the number removed.
    ///
    /// A full scan per pass; the store's target size keeps this cheap.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            if let Some((old_key, old)) = self.entries.remove_entry(key.as_str()) {
                self.usage -= old.charged_bytes(&old_key);
                self.index.remove(&old.index_key);
                debug!(key = %old_key, "removed expired entry");
            }
        }
        expired.len()
    }

    // == Evict To Capacity ==
    /// Evicts oldest-inserted entries until `usage <= max_bytes` or the
    /// store is empty. Returns the number evicted.
    pub fn evict_to_capacity(&mut self) -> usize {
        let mut evicted = 0;
        while self.usage > self.max_bytes {
            let Some((_, key)) = self.index.pop_first() else {
                break;
            };
            if let Some((old_key, old)) = self.entries.remove_entry(&key) {
                self.usage -= old.charged_bytes(&old_key);
                debug!(key = %old_key, usage = self.usage, "evicted oldest entry");
                evicted += 1;
            }
        }
        evicted
    }

    // == Accessors ==
    /// Current number of entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current charged usage in bytes.
    pub fn usage(&self) -> usize {
        self.usage
    }

    /// The configured usage bound in bytes.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }
}

#[cfg(test)]
impl MemoryStore {
    /// Recomputes usage from scratch over the live entries.
    pub(crate) fn recomputed_usage(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, entry)| entry.charged_bytes(key))
            .sum()
    }

    /// Number of slots in the ordering index.
    pub(crate) fn index_len(&self) -> usize {
        self.index.len()
    }

    /// True when map and index correspond one-to-one.
    pub(crate) fn index_is_bijective(&self) -> bool {
        self.index.len() == self.entries.len()
            && self.index.iter().all(|(index_key, key)| {
                self.entries
                    .get(key)
                    .is_some_and(|entry| entry.index_key == *index_key)
            })
    }
}
