//! Write path: validated, idempotent insertion of inbound messages.

use serde::{Deserialize, Serialize};
use sqlx::Connection;

use super::{MessageStore, StorageError};

/// A fully populated inbound message ready for insertion.
///
/// `create_time` is assigned by the producer (epoch seconds) and is the
/// canonical ordering key for listings; the store adds its own `created_at`
/// audit timestamp at insert time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub msg_id: String,
    pub group_id: String,
    pub group_name: String,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub msg_type: String,
    pub create_time: i64,
}

impl NewMessage {
    /// Check that all identifier fields are non-empty.
    fn validate(&self) -> Result<(), StorageError> {
        if self.msg_id.is_empty() {
            return Err(StorageError::Invalid("msg_id"));
        }
        if self.group_id.is_empty() {
            return Err(StorageError::Invalid("group_id"));
        }
        if self.sender_id.is_empty() {
            return Err(StorageError::Invalid("sender_id"));
        }
        Ok(())
    }
}

/// Outcome of a successful `save_message` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    /// The record was inserted.
    Inserted,
    /// A record with the same `msg_id` already exists; nothing was written.
    Duplicate,
}

impl MessageStore {
    /// Persist one inbound message.
    ///
    /// Re-delivery of an already stored `msg_id` is expected and must not
    /// fail the producer: the unique constraint rejects the insert, a warning
    /// is logged, and `Saved::Duplicate` is returned. Any other failure rolls
    /// the transaction back and surfaces as [`StorageError::Write`]; no
    /// partial row is ever visible.
    pub async fn save_message(&self, message: &NewMessage) -> Result<Saved, StorageError> {
        message.validate()?;

        let mut conn = self.conn.lock().await;
        let mut tx = conn.begin().await.map_err(StorageError::Write)?;

        let result = sqlx::query(
            "INSERT INTO group_messages \
             (msg_id, group_id, group_name, sender_id, sender_name, content, msg_type, create_time) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&message.msg_id)
        .bind(&message.group_id)
        .bind(&message.group_name)
        .bind(&message.sender_id)
        .bind(&message.sender_name)
        .bind(&message.content)
        .bind(&message.msg_type)
        .bind(message.create_time)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {
                tx.commit().await.map_err(StorageError::Write)?;
                Ok(Saved::Inserted)
            }
            Err(e) if is_unique_violation(&e) => {
                tx.rollback().await.map_err(StorageError::Write)?;
                tracing::warn!(msg_id = %message.msg_id, "Duplicate message id, keeping existing record");
                Ok(Saved::Duplicate)
            }
            Err(e) => {
                tx.rollback().await.map_err(StorageError::Write)?;
                Err(StorageError::Write(e))
            }
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
