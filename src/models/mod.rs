//! Request and Reply models for the cache service wire protocol
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing the newline-framed JSON requests and replies,
//! plus the row types shared with the storage tiers.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{Request, SetFlags};
pub use responses::{
    DeleteReply, ErrorReply, GetGroupReply, GetKeyReply, KeyValue, ListReply, SetReply, StorageRow,
};
