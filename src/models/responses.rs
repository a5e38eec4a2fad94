//! Reply DTOs for the cache service
//!
//! Defines the structure of outgoing JSON reply frames. Success replies echo
//! the request id and carry the operation result under `response`; error
//! replies carry only an `error` message.

use serde::{Deserialize, Serialize};

/// A key/value pair as returned by group queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

/// A full entry row as returned by LIST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRow {
    pub key: String,
    pub value: String,
    pub group: String,
}

/// Reply to a SET request.
#[derive(Debug, Clone, Serialize)]
pub struct SetReply {
    pub id: String,
    pub response: bool,
}

/// Reply to a GET KEY request; `response` is empty when the key is absent
/// or expired in both tiers.
#[derive(Debug, Clone, Serialize)]
pub struct GetKeyReply {
    pub id: String,
    pub response: String,
}

/// Reply to a GET GROUP request.
#[derive(Debug, Clone, Serialize)]
pub struct GetGroupReply {
    pub id: String,
    pub response: Vec<KeyValue>,
}

/// Reply to DELETE KEY and DELETE GROUP requests; `response` is the sum of
/// the per-tier removal counts.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteReply {
    pub id: String,
    pub response: u64,
}

/// Reply to a LIST request.
#[derive(Debug, Clone, Serialize)]
pub struct ListReply {
    pub id: String,
    pub response: Vec<StorageRow>,
}

/// Error reply for all failure conditions. Carries no id.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReply {
    pub error: String,
}

impl ErrorReply {
    /// Creates a new ErrorReply
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
