//! Request Dispatcher
//!
//! Bridges the wire format to the storage router: parses a request frame,
//! calls the matching router operation, and serializes the typed reply.
//!
//! The client-supplied id is echoed into every success reply; failures of
//! any kind collapse into an `{"error": ...}` frame without an id.

use serde::Serialize;

use crate::error::{CacheError, Result};
use crate::models::{
    DeleteReply, ErrorReply, GetGroupReply, GetKeyReply, ListReply, Request, SetReply,
};
use crate::storage::StorageRouter;

/// Parses a single request frame.
pub fn parse_request(line: &str) -> Result<Request> {
    serde_json::from_str(line).map_err(|e| CacheError::Parse(e.to_string()))
}

/// Handles one request line end to end and returns the reply frame
/// (without the trailing newline).
pub async fn handle_line(router: &StorageRouter, line: &str) -> String {
    match parse_request(line) {
        Ok(request) => dispatch(router, request).await,
        Err(e) => encode(&ErrorReply::new(e.to_string())),
    }
}

/// Maps a parsed request onto the router and packages the typed reply.
pub async fn dispatch(router: &StorageRouter, request: Request) -> String {
    let result = match request {
        Request::Set {
            id,
            flags,
            key,
            value,
            group,
        } => router
            .set(&key, &value, &group, flags.ttl, flags.persistent)
            .await
            .map(|response| encode(&SetReply { id, response })),

        Request::GetKey { id, key } => router
            .get_key(&key)
            .await
            .map(|response| encode(&GetKeyReply { id, response })),

        Request::GetGroup { id, group } => router
            .get_group(&group)
            .await
            .map(|response| encode(&GetGroupReply { id, response })),

        Request::DeleteKey { id, key } => router
            .delete_key(&key)
            .await
            .map(|response| encode(&DeleteReply { id, response })),

        Request::DeleteGroup { id, group } => router
            .delete_group(&group)
            .await
            .map(|response| encode(&DeleteReply { id, response })),

        Request::List { id } => router
            .list()
            .await
            .map(|response| encode(&ListReply { id, response })),
    };

    result.unwrap_or_else(|e| encode(&ErrorReply::new(e.to_string())))
}

fn encode<T: Serialize>(reply: &T) -> String {
    match serde_json::to_string(reply) {
        Ok(frame) => frame,
        Err(e) => format!(r#"{{"error":"{e}"}}"#),
    }
}
