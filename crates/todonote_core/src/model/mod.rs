//! Domain model for notes and sessions.
//!
//! # Responsibility
//! - Define the note record shared by the remote and local stores.
//! - Validate create input before any storage or network work happens.
//!
//! # Invariants
//! - Note text (`value`) is stored trimmed and is the uniqueness key.
//! - A `Session` token is opaque and never logged.

pub mod note;
pub mod session;
