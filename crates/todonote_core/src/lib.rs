//! Core domain logic for TodoNote.
//! This crate owns the note list, its synchronization and its invariants.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod remote;
pub mod repo;
pub mod service;
pub mod view;

pub use app::{AppContext, Dispatch, Intent};
pub use config::{AppConfig, Backend, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteDraft, NoteId, NoteValidationError, Priority};
pub use model::session::Session;
pub use remote::{HttpTodoApi, RemoteError, TodoApi, DEFAULT_BASE_URL};
pub use repo::kv_repo::{KeyValueStore, RepoError, RepoResult, SqliteKeyValueStore};
pub use repo::session_repo::{
    KvSessionRepository, MemorySessionRepository, SessionRepository, SessionScope,
};
pub use service::error::{StoreError, StoreResult};
pub use service::local_store::LocalNoteStore;
pub use service::remote_store::RemoteNoteStore;
pub use service::{NoteStore, SessionControl};
pub use view::board::{render_board, Board};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
