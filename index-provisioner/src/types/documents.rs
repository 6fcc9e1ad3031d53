//! Document shapes of the collections covered by the index manifest.

use mongodb::bson;
use serde::{Deserialize, Serialize};

/// An action scheduled on a server. The `(server_number, action_type, selected_bots, delay)`
/// tuple is unique across the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveAction {
    pub server_number: i32,
    pub action_type: String,
    pub selected_bots: Vec<String>,
    /// Delay between repetitions, in seconds
    pub delay: i64,
}

/// A finished operation, kept for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedOperation {
    pub operation_id: String,
    /// Must stay a BSON date: the TTL monitor skips documents whose field holds any other type.
    pub created_at: bson::DateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheVersion {
    pub key: String,
    pub version: i64,
}
