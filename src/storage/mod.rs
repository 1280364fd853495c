//! SQLite-backed storage for group chat messages.
//!
//! The store owns a single database connection behind an async mutex. Every
//! read and write acquires the lock for its full duration (execute, then
//! commit or rollback, then release), so no two operations ever interleave
//! at the storage layer. SQLite does not allow concurrent writers; holding
//! the lock across reads as well keeps the whole concurrency story to one
//! lock, which is acceptable for a read-light, write-light archive.

mod groups;
mod ingest;
mod messages;

pub use groups::GroupRow;
pub use ingest::{NewMessage, Saved};
pub use messages::{MessageFilter, MessageRow, DEFAULT_LIMIT, MAX_LIMIT};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sqlx::{Connection, SqliteConnection};
use std::path::Path;
use tokio::sync::Mutex;

/// File name of the message database inside the data directory.
pub const DB_FILE_NAME: &str = "group_messages.db";

/// Storage layer errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Could not create or open the database, or could not ensure schema.
    /// Fatal: startup must abort, the schema cannot be left partial.
    #[error("Failed to initialize message store at '{path}': {source}")]
    Init {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A message record is missing a required identifier field.
    #[error("Invalid message: missing required field '{0}'")]
    Invalid(&'static str),

    /// An insert failed for a reason other than a duplicate `msg_id`.
    /// The transaction was rolled back; the caller may retry or drop.
    #[error("Failed to write message: {0}")]
    Write(#[source] sqlx::Error),

    /// A read failed.
    #[error("Query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// Point lookup found no record for the given message id.
    #[error("Message '{0}' not found")]
    NotFound(String),
}

/// Handle to the message store.
///
/// Constructed once at startup and handed by reference to every collaborator
/// (HTTP handlers and the ingestion path), so there is exactly one instance
/// per process without any ambient global state.
pub struct MessageStore {
    conn: Mutex<SqliteConnection>,
}

impl MessageStore {
    /// Open (creating if absent) the message database under `data_dir` and
    /// ensure its schema.
    ///
    /// Safe to call against an existing database: schema setup is
    /// create-if-absent only. Fails with [`StorageError::Init`] if the
    /// directory is not writable or the connection cannot be established.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = data_dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| init_err(dir, e))?;

        let path = dir.join(DB_FILE_NAME);
        let opts = SqliteConnectOptions::new()
            .filename(&path)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        let mut conn = SqliteConnection::connect_with(&opts)
            .await
            .map_err(|e| init_err(&path, e))?;

        init_schema(&mut conn).await.map_err(|e| init_err(&path, e))?;

        tracing::info!(path = %path.display(), "Opened message store");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a fresh, empty in-memory store.
    ///
    /// Used by tests; contents are lost when the handle is dropped.
    pub async fn open_in_memory() -> Result<Self, StorageError> {
        let opts = SqliteConnectOptions::new().in_memory(true);

        let mut conn = SqliteConnection::connect_with(&opts)
            .await
            .map_err(|e| init_err(Path::new(":memory:"), e))?;

        init_schema(&mut conn)
            .await
            .map_err(|e| init_err(Path::new(":memory:"), e))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn init_err(path: &Path, source: impl std::error::Error + Send + Sync + 'static) -> StorageError {
    StorageError::Init {
        path: path.display().to_string(),
        source: Box::new(source),
    }
}

/// Create the message table and its indexes if they do not exist yet.
///
/// `msg_id` carries the UNIQUE constraint that backs deduplication;
/// `create_time` is the producer-assigned ordering key, while `created_at`
/// is a store-assigned audit timestamp.
async fn init_schema(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS group_messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            msg_id TEXT UNIQUE,
            group_id TEXT,
            group_name TEXT,
            sender_id TEXT,
            sender_name TEXT,
            content TEXT,
            msg_type TEXT,
            create_time INTEGER,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(&mut *conn)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_group_id ON group_messages(group_id)")
        .execute(&mut *conn)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_create_time ON group_messages(create_time)")
        .execute(&mut *conn)
        .await?;

    Ok(())
}
