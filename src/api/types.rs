//! Wire types for the HTTP API.

use serde::{Deserialize, Serialize};

/// Query parameters for GET /messages.
#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub group_id: Option<String>,
    pub sender_id: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub msg_type: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// A single entry in the GET /groups response.
#[derive(Debug, Serialize)]
pub struct GroupInfo {
    pub group_id: String,
    pub group_name: String,
    pub message_count: i64,
    /// Formatted as "YYYY-MM-DD HH:MM:SS" (UTC).
    pub last_active: String,
}

/// Response body for POST /messages.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
}
