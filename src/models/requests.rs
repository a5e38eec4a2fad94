//! Request DTOs for the cache service
//!
//! Defines the structure of incoming JSON request frames. The `event` field
//! selects the operation; unknown tags fail deserialization and surface as an
//! error reply.

use serde::Deserialize;

/// A single client request, tagged by its `event` field.
///
/// Tags are case-sensitive. Every variant carries the client-supplied `id`,
/// which is echoed unchanged into the reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event")]
pub enum Request {
    /// Store a value under a key, in exactly one tier.
    #[serde(rename = "SET")]
    Set {
        id: String,
        flags: SetFlags,
        key: String,
        value: String,
        group: String,
    },

    /// Look a key up, memory tier first.
    #[serde(rename = "GET KEY")]
    GetKey { id: String, key: String },

    /// Fetch every entry of a group from both tiers.
    #[serde(rename = "GET GROUP")]
    GetGroup { id: String, group: String },

    /// Remove a key from both tiers.
    #[serde(rename = "DELETE KEY")]
    DeleteKey { id: String, key: String },

    /// Remove every entry of a group from both tiers.
    #[serde(rename = "DELETE GROUP")]
    DeleteGroup { id: String, group: String },

    /// Snapshot of every entry in both tiers.
    #[serde(rename = "LIST")]
    List { id: String },
}

/// Routing flags carried by a SET request.
#[derive(Debug, Clone, Deserialize)]
pub struct SetFlags {
    /// True routes the write to the durable tier, false to the memory tier.
    pub persistent: bool,
    /// Time-to-live in seconds; zero or negative means the entry never
    /// expires. Only meaningful for the memory tier.
    pub ttl: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{
            "id": "1", "event": "SET",
            "flags": {"persistent": false, "ttl": 60},
            "key": "k", "value": "v", "group": "g"
        }"#;
        let req: Request = serde_json::from_str(json).unwrap();
        match req {
            Request::Set {
                id,
                flags,
                key,
                value,
                group,
            } => {
                assert_eq!(id, "1");
                assert!(!flags.persistent);
                assert_eq!(flags.ttl, 60);
                assert_eq!(key, "k");
                assert_eq!(value, "v");
                assert_eq!(group, "g");
            }
            other => panic!("expected SET, got {:?}", other),
        }
    }

    #[test]
    fn test_get_key_request_deserialize() {
        let json = r#"{"id": "2", "event": "GET KEY", "key": "k"}"#;
        let req: Request = serde_json::from_str(json).unwrap();
        assert!(matches!(req, Request::GetKey { .. }));
    }

    #[test]
    fn test_list_request_deserialize() {
        let json = r#"{"id": "3", "event": "LIST"}"#;
        let req: Request = serde_json::from_str(json).unwrap();
        assert!(matches!(req, Request::List { .. }));
    }

    #[test]
    fn test_unknown_event_tag_rejected() {
        let json = r#"{"id": "4", "event": "FLUSH"}"#;
        let result: Result<Request, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_event_tag_is_case_sensitive() {
        let json = r#"{"id": "5", "event": "get key", "key": "k"}"#;
        let result: Result<Request, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_set_request_missing_field_rejected() {
        // No "key" field.
        let json = r#"{
            "id": "6", "event": "SET",
            "flags": {"persistent": false, "ttl": 0},
            "value": "v", "group": "g"
        }"#;
        let result: Result<Request, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
