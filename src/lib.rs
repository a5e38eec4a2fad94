//! tierkv - A two-tier local key-value cache service
//!
//! Serves newline-framed JSON over a Unix stream socket. Entries carry a
//! group label and route to one of two tiers: an in-memory store with TTL
//! expiry and size-bounded eviction, or a SQLite-backed durable store.
//! Reads consult both tiers and merge results.

pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod storage;
pub mod tasks;

pub use config::Config;
pub use error::{CacheError, Result};
pub use storage::{DiskStore, MemoryStore, StorageRouter};
pub use tasks::spawn_sweeper;
