//! Proxy request types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An authenticated query bound for the DSP upstream.
///
/// Only these fields ever reach the upstream; anything else a client sends is
/// dropped at deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Natural language prompt or query for the DSP
    pub query: String,
    /// Optional structured extras, forwarded verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<Map<String, Value>>,
}
