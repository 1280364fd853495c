//! Per-group aggregate queries.

use super::{MessageStore, StorageError};

/// A derived per-group summary row; computed at query time, never stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupRow {
    pub group_id: String,
    pub group_name: String,
    pub message_count: i64,
    /// Max `create_time` among the group's messages, epoch seconds.
    pub last_active: i64,
}

impl MessageStore {
    /// Summarize all messages by (group id, group name), most recently
    /// active first.
    ///
    /// Grouping is by the pair, so a group whose display name changed across
    /// messages yields one row per distinct name ever used. That split is
    /// deliberate; collapsing to the most recent name would need a window
    /// function and a different contract.
    pub async fn list_groups(&self) -> Result<Vec<GroupRow>, StorageError> {
        let mut conn = self.conn.lock().await;
        sqlx::query_as::<_, GroupRow>(
            "SELECT group_id, group_name, \
             COUNT(*) AS message_count, \
             MAX(create_time) AS last_active \
             FROM group_messages \
             GROUP BY group_id, group_name \
             ORDER BY last_active DESC",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(StorageError::Query)
    }
}
