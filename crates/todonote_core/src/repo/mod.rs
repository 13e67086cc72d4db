//! Durable storage contracts and SQLite implementations.
//!
//! # Responsibility
//! - Provide the key-value contract behind local notes and saved sessions.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Storage calls are synchronous and complete before the caller continues.
//! - Keys are non-empty.

pub mod kv_repo;
pub mod session_repo;
