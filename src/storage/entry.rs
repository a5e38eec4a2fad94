//! Memory-Tier Entry Module
//!
//! Defines the structure of individual memory-tier entries and the byte
//! accounting charged against the store's usage bound.

use std::mem;
use std::time::{Duration, Instant};

/// Position of an entry in the eviction ordering index.
///
/// The index orders entries by insertion instant; the sequence number keeps
/// entries inserted at the same instant distinct, so the index behaves as a
/// multiset with a consistent tie-break.
pub type IndexKey = (Instant, u64);

// == Memory Entry ==
/// A single memory-tier entry: value, group label and timing metadata.
#[derive(Debug, Clone)]
pub struct MemEntry {
    /// The stored value
    pub value: String,
    /// Group label used for batch retrieval and deletion
    pub group: String,
    /// Insertion instant; reset when the key is overwritten
    pub inserted_at: Instant,
    /// Expiration instant, None = never expires
    pub expires_at: Option<Instant>,
    /// This entry's slot in the eviction ordering index
    pub index_key: IndexKey,
}

impl MemEntry {
    /// Creates a new entry inserted at `inserted_at` with sequence number
    /// `seq` in the ordering index.
    ///
    /// A `ttl_seconds` of zero or less means the entry never expires.
    pub fn new(
        value: String,
        group: String,
        ttl_seconds: i64,
        inserted_at: Instant,
        seq: u64,
    ) -> Self {
        let expires_at = if ttl_seconds > 0 {
            Some(inserted_at + Duration::from_secs(ttl_seconds as u64))
        } else {
            None
        };

        Self {
            value,
            group,
            inserted_at,
            expires_at,
            index_key: (inserted_at, seq),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired as of `now`.
    ///
    /// An entry is expired once `now` reaches its expiration instant; an
    /// entry without one never expires.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Charged Bytes ==
    /// Bytes charged against the store's usage bound for this entry under
    /// its key.
    ///
    /// Charges a string header plus buffer bytes per string field, plus the
    /// fixed metadata fields. The same function must run on insert, delete,
    /// expiry and eviction; the accounting is symmetric, not a measure of
    /// real heap use.
    pub fn charged_bytes(&self, key: &str) -> usize {
        const STRING_HEADER: usize = mem::size_of::<String>();

        STRING_HEADER
            + key.len()
            + STRING_HEADER
            + self.value.capacity()
            + STRING_HEADER
            + self.group.capacity()
            + mem::size_of::<Instant>()
            + mem::size_of::<Option<Instant>>()
            + mem::size_of::<IndexKey>()
    }
}
