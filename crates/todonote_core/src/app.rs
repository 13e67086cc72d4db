//! Application context and user-intent dispatch.
//!
//! # Responsibility
//! - Hold the one note store (and its session control) built at startup.
//! - Translate renderer intents into store calls.
//!
//! # Invariants
//! - Blank note text and blank credentials are ignored before any store call.
//! - Callers re-read `notes()` after every dispatch, successful or not.

use crate::model::note::{Note, NoteDraft, NoteId, Priority};
use crate::remote::TodoApi;
use crate::repo::session_repo::SessionRepository;
use crate::service::error::{StoreError, StoreResult};
use crate::service::local_store::LocalNoteStore;
use crate::service::remote_store::RemoteNoteStore;
use crate::service::{NoteStore, SessionControl};
use crate::view::board::Board;
use log::debug;
use std::sync::Arc;

/// User action captured by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SubmitNote {
        text: String,
        priority: Priority,
        details: Option<String>,
    },
    RemoveNote {
        id: NoteId,
    },
    ToggleNote {
        id: NoteId,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
}

impl Intent {
    fn name(&self) -> &'static str {
        match self {
            Self::SubmitNote { .. } => "submit_note",
            Self::RemoveNote { .. } => "remove_note",
            Self::ToggleNote { .. } => "toggle_note",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
        }
    }
}

/// Whether a dispatched intent reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Applied,
    /// Input was blank; nothing was called.
    Ignored,
}

/// Explicit application context, constructed once and passed to handlers.
pub struct AppContext {
    store: Arc<dyn NoteStore>,
    session: Option<Arc<dyn SessionControl>>,
}

impl AppContext {
    pub fn remote<A, S>(store: RemoteNoteStore<A, S>) -> Self
    where
        A: TodoApi + 'static,
        S: SessionRepository + 'static,
    {
        let store = Arc::new(store);
        Self {
            store: Arc::clone(&store) as Arc<dyn NoteStore>,
            session: Some(store),
        }
    }

    pub fn local(store: LocalNoteStore) -> Self {
        Self {
            store: Arc::new(store),
            session: None,
        }
    }

    pub fn notes(&self) -> Vec<Note> {
        self.store.notes()
    }

    pub fn board(&self) -> Board {
        Board::from_notes(&self.store.notes())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.is_authenticated())
    }

    /// Restores a saved session and reloads the list.
    ///
    /// Returns `false` when nothing was saved or the backend is local.
    pub async fn resume(&self) -> StoreResult<bool> {
        let Some(session) = &self.session else {
            return Ok(false);
        };
        if session.resume()?.is_none() {
            return Ok(false);
        }
        session.refresh().await?;
        Ok(true)
    }

    /// Reloads the list from the service; local backends already hold it.
    pub async fn refresh(&self) -> StoreResult<()> {
        match &self.session {
            Some(session) => session.refresh().await.map(drop),
            None => Ok(()),
        }
    }

    fn session_control(&self) -> StoreResult<&Arc<dyn SessionControl>> {
        self.session.as_ref().ok_or(StoreError::SessionUnsupported)
    }

    pub async fn dispatch(&self, intent: Intent) -> StoreResult<Dispatch> {
        debug!("event=intent module=app name={}", intent.name());
        match intent {
            Intent::SubmitNote {
                text,
                priority,
                details,
            } => {
                if text.trim().is_empty() {
                    return Ok(Dispatch::Ignored);
                }
                let mut draft = NoteDraft::new(&text, priority)?;
                if let Some(details) = details {
                    draft = draft.with_details(&details);
                }
                self.store.create_note(draft).await?;
            }
            Intent::RemoveNote { id } => self.store.delete_note(&id).await?,
            Intent::ToggleNote { id } => {
                self.store.toggle_done(&id).await?;
            }
            Intent::Login { email, password } => {
                let session = self.session_control()?;
                let credential = format!("{}{}", email.trim(), password.trim());
                if credential.is_empty() {
                    return Ok(Dispatch::Ignored);
                }
                session.authenticate(&credential).await?;
            }
            Intent::Logout => self.session_control()?.logout()?,
        }
        Ok(Dispatch::Applied)
    }
}
