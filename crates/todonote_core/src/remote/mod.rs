//! Remote to-do service transport.
//!
//! # Responsibility
//! - Define the `TodoApi` seam used by `RemoteNoteStore`.
//! - Provide the reqwest-backed HTTP+JSON implementation.
//!
//! # Invariants
//! - Every call except login carries `Authorization: Bearer <token>`.
//! - Success means an HTTP success status; login also needs `access_token`.

pub mod client;
pub mod types;

pub use client::{HttpTodoApi, RemoteError, TodoApi, DEFAULT_BASE_URL};
pub use types::{CreateNoteBody, LoginBody, LoginResponse, RemoteNote};
