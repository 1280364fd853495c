//! Filtered, paginated message queries and point lookup.

use serde::Serialize;

use super::{MessageStore, StorageError};

/// Default page size when the caller does not ask for one.
pub const DEFAULT_LIMIT: u32 = 50;
/// Hard cap on page size; larger requests are clamped, never rejected.
pub const MAX_LIMIT: u32 = 100;

/// Column list shared by the listing and point-lookup queries.
const SELECT_COLUMNS: &str = "SELECT id, msg_id, group_id, group_name, sender_id, sender_name, \
     content, msg_type, create_time, created_at FROM group_messages";

/// A stored message row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MessageRow {
    pub id: i64,
    pub msg_id: String,
    pub group_id: String,
    pub group_name: String,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub msg_type: String,
    pub create_time: i64,
    pub created_at: String,
}

/// Optional filter predicates for message listings.
///
/// Supplied filters are combined with AND; omitted filters impose no
/// constraint. Time bounds are inclusive on both ends.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    pub group_id: Option<String>,
    pub sender_id: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub msg_type: Option<String>,
}

/// A filter value bound into the query as a parameter.
enum Bind {
    Text(String),
    Int(i64),
}

impl MessageFilter {
    /// Lower the filter into (condition, bound value) pairs.
    ///
    /// Each pair becomes one parameterized `column op ?` clause; values are
    /// never interpolated into the query text.
    fn conditions(&self) -> Vec<(&'static str, Bind)> {
        let mut conds = Vec::new();
        if let Some(g) = &self.group_id {
            conds.push(("group_id = ?", Bind::Text(g.clone())));
        }
        if let Some(s) = &self.sender_id {
            conds.push(("sender_id = ?", Bind::Text(s.clone())));
        }
        if let Some(t) = self.start_time {
            conds.push(("create_time >= ?", Bind::Int(t)));
        }
        if let Some(t) = self.end_time {
            conds.push(("create_time <= ?", Bind::Int(t)));
        }
        if let Some(m) = &self.msg_type {
            conds.push(("msg_type = ?", Bind::Text(m.clone())));
        }
        conds
    }
}

impl MessageStore {
    /// List messages matching `filter`, newest first.
    ///
    /// `limit` is clamped to [`MAX_LIMIT`]; `offset` is unbounded. Rows with
    /// equal `create_time` come back in the engine's natural order, so the
    /// relative order of ties is not guaranteed. An empty page is a normal
    /// result, not an error.
    pub async fn list_messages(
        &self,
        filter: &MessageFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<MessageRow>, StorageError> {
        let limit = limit.min(MAX_LIMIT);
        let conds = filter.conditions();

        let mut sql = String::from(SELECT_COLUMNS);
        if !conds.is_empty() {
            sql.push_str(" WHERE ");
            let clauses: Vec<&str> = conds.iter().map(|(clause, _)| *clause).collect();
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY create_time DESC LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, MessageRow>(&sql);
        for (_, value) in &conds {
            query = match value {
                Bind::Text(v) => query.bind(v.clone()),
                Bind::Int(v) => query.bind(*v),
            };
        }
        query = query.bind(i64::from(limit)).bind(i64::from(offset));

        let mut conn = self.conn.lock().await;
        query.fetch_all(&mut *conn).await.map_err(StorageError::Query)
    }

    /// Fetch the unique record for `msg_id`.
    ///
    /// At most one row can match given the unique constraint. Signals
    /// [`StorageError::NotFound`] for unknown ids; that is an expected
    /// outcome, not a failure.
    pub async fn get_message(&self, msg_id: &str) -> Result<MessageRow, StorageError> {
        let sql = format!("{} WHERE msg_id = ?", SELECT_COLUMNS);

        let mut conn = self.conn.lock().await;
        sqlx::query_as::<_, MessageRow>(&sql)
            .bind(msg_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(StorageError::Query)?
            .ok_or_else(|| StorageError::NotFound(msg_id.to_string()))
    }
}
