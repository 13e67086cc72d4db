//! Store-level error taxonomy.

use crate::model::note::{NoteId, NoteValidationError};
use crate::remote::RemoteError;
use crate::repo::kv_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// Create input failed validation; nothing was sent or stored.
    InvalidText(NoteValidationError),
    /// Blank login credential; nothing was sent.
    EmptyCredential,
    /// Login was rejected or the auth endpoint was unreachable.
    Auth(RemoteError),
    /// Operation needs a session and none is active.
    NotAuthenticated,
    Fetch(RemoteError),
    Create(RemoteError),
    /// Another note already uses this text.
    Duplicate(String),
    Delete(RemoteError),
    Toggle(RemoteError),
    NotFound(NoteId),
    /// The backend has no notion of sessions.
    SessionUnsupported,
    Storage(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidText(err) => write!(f, "{err}"),
            Self::EmptyCredential => write!(f, "authentication failed: credential is empty"),
            Self::Auth(err) => write!(f, "authentication failed: {err}"),
            Self::NotAuthenticated => write!(f, "not logged in"),
            Self::Fetch(err) => write!(f, "failed to fetch notes: {err}"),
            Self::Create(err) => write!(f, "failed to create note: {err}"),
            Self::Duplicate(value) => write!(f, "note already exists: `{value}`"),
            Self::Delete(err) => write!(f, "failed to delete note: {err}"),
            Self::Toggle(err) => write!(f, "failed to toggle note: {err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::SessionUnsupported => write!(f, "this backend does not use sessions"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidText(err) => Some(err),
            Self::Auth(err)
            | Self::Fetch(err)
            | Self::Create(err)
            | Self::Delete(err)
            | Self::Toggle(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::EmptyCredential
            | Self::NotAuthenticated
            | Self::Duplicate(_)
            | Self::NotFound(_)
            | Self::SessionUnsupported => None,
        }
    }
}

impl From<NoteValidationError> for StoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::InvalidText(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

impl StoreError {
    /// Stable short code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidText(_) => "invalid_text",
            Self::EmptyCredential => "empty_credential",
            Self::Auth(_) => "auth_failed",
            Self::NotAuthenticated => "not_authenticated",
            Self::Fetch(_) => "fetch_failed",
            Self::Create(_) => "create_failed",
            Self::Duplicate(_) => "duplicate",
            Self::Delete(_) => "delete_failed",
            Self::Toggle(_) => "toggle_failed",
            Self::NotFound(_) => "not_found",
            Self::SessionUnsupported => "session_unsupported",
            Self::Storage(_) => "storage_failed",
        }
    }
}
