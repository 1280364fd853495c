//! HTTP request handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::server::AppState;
use super::types::{GroupInfo, IngestResponse, MessagesQuery};
use crate::error::Error;
use crate::storage::{MessageFilter, NewMessage, Saved, DEFAULT_LIMIT};

/// Handle GET /messages -- filtered, paginated message listing.
pub async fn list_messages(
    State(state): State<AppState>,
    Query(params): Query<MessagesQuery>,
) -> Result<impl IntoResponse, Error> {
    let filter = MessageFilter {
        group_id: params.group_id,
        sender_id: params.sender_id,
        start_time: params.start_time,
        end_time: params.end_time,
        msg_type: params.msg_type,
    };
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = params.offset.unwrap_or(0);

    tracing::debug!(
        group_id = ?filter.group_id,
        sender_id = ?filter.sender_id,
        start_time = ?filter.start_time,
        end_time = ?filter.end_time,
        msg_type = ?filter.msg_type,
        limit,
        offset,
        "Message listing query"
    );

    let rows = state.store.list_messages(&filter, limit, offset).await?;
    Ok(Json(rows))
}

/// Handle GET /messages/:msg_id -- point lookup by external message id.
pub async fn get_message(
    State(state): State<AppState>,
    Path(msg_id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let row = state.store.get_message(&msg_id).await?;
    Ok(Json(row))
}

/// Handle GET /groups -- per-group message counts and last activity.
pub async fn list_groups(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let rows = state.store.list_groups().await?;

    let groups: Vec<GroupInfo> = rows
        .into_iter()
        .map(|row| GroupInfo {
            group_id: row.group_id,
            group_name: row.group_name,
            message_count: row.message_count,
            last_active: format_epoch(row.last_active),
        })
        .collect();

    Ok(Json(groups))
}

/// Handle POST /messages -- persist one inbound chat message.
///
/// Re-delivery of a known msg_id is reported as "duplicate" but is still a
/// success from the producer's point of view.
pub async fn ingest_message(
    State(state): State<AppState>,
    Json(message): Json<NewMessage>,
) -> Result<impl IntoResponse, Error> {
    let saved = state.store.save_message(&message).await?;

    let status = match saved {
        Saved::Inserted => "ok",
        Saved::Duplicate => "duplicate",
    };

    Ok((StatusCode::CREATED, Json(IngestResponse { status })))
}

/// Handle GET /health -- liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Render an epoch-seconds timestamp as "YYYY-MM-DD HH:MM:SS" (UTC).
fn format_epoch(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::format_epoch;

    #[test]
    fn test_format_epoch() {
        assert_eq!(format_epoch(0), "1970-01-01 00:00:00");
        assert_eq!(format_epoch(3000), "1970-01-01 00:50:00");
    }

    #[test]
    fn test_format_epoch_out_of_range_falls_back_to_raw() {
        assert_eq!(format_epoch(i64::MAX), i64::MAX.to_string());
    }
}
