//! Realtime conversation/messaging core.
//!
//! Conversation registry (direct + group), append-only message store with
//! soft delete, edits and reactions, read-receipt watermarks, ephemeral
//! typing presence, and a push-based live-query layer. State lives in an
//! in-memory document store; every read has a `watch_*` counterpart that
//! re-emits whenever a record it depends on changes.

pub mod config;
pub mod error;
pub mod live;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
