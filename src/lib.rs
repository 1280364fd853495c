//! grouplog - group chat message archive with an HTTP query API.
//!
//! Inbound chat messages are persisted append-only into an embedded SQLite
//! store; filtered, paginated listings and per-group aggregates are served
//! over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use storage::MessageStore;
