//! HTTP API module.
//!
//! Thin axum plumbing over the message store: request parsing, response
//! serialization, CORS, and error mapping live here. All storage semantics
//! live in [`crate::storage`].

mod handlers;
mod server;
pub mod types;

pub use server::{create_router, run_server, AppState};
