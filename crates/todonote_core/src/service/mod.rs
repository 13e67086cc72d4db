//! Note store use-cases.
//!
//! # Responsibility
//! - Own the authoritative in-memory note list and the session token.
//! - Keep the renderer and CLI decoupled from transport and storage details.
//!
//! # Invariants
//! - Remote stores mutate the list only after the service confirms success.
//! - Local stores mutate first, then write the whole list behind.
//! - No lock is held across a network call.

pub mod error;
pub mod local_store;
pub mod remote_store;

use crate::model::note::{Note, NoteDraft, NoteId};
use crate::model::session::Session;
use async_trait::async_trait;
use self::error::StoreResult;

/// CRUD contract shared by every note backend.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Snapshot of the current list in insertion order.
    fn notes(&self) -> Vec<Note>;
    async fn create_note(&self, draft: NoteDraft) -> StoreResult<Note>;
    async fn delete_note(&self, id: &NoteId) -> StoreResult<()>;
    /// Flips the completion flag and returns the updated note.
    async fn toggle_done(&self, id: &NoteId) -> StoreResult<Note>;
}

/// Session lifecycle for backends that need authentication.
#[async_trait]
pub trait SessionControl: Send + Sync {
    /// Logs in, stores the token, then refreshes the list.
    async fn authenticate(&self, credential: &str) -> StoreResult<Session>;
    /// Replaces the whole list with the service's current list.
    async fn refresh(&self) -> StoreResult<Vec<Note>>;
    /// Injects a known token without a network round trip.
    fn restore_token(&self, token: &str);
    /// Restores the persisted session, if any.
    fn resume(&self) -> StoreResult<Option<Session>>;
    /// Drops the token and the list, and clears the persisted session.
    fn logout(&self) -> StoreResult<()>;
    fn session(&self) -> Option<Session>;

    fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }
}
