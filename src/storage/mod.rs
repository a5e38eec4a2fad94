//! Storage Module
//!
//! The storage subsystem: the in-memory tier with TTL expiry and
//! size-bounded eviction, the SQLite-backed durable tier, and the router
//! that fans requests out across both and merges their answers.

mod disk;
mod entry;
mod memory;
mod router;


// Re-export public types
pub use disk::DiskStore;
pub use entry::{IndexKey, MemEntry};
pub use memory::MemoryStore;
pub use router::StorageRouter;
