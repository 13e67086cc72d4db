//! Note store backed by durable local key-value storage.
//!
//! # Responsibility
//! - Keep the list in memory and write it behind after every mutation.
//!
//! # Invariants
//! - The whole list is stored as one JSON array under `NOTES_KEY`.
//! - A local note's id is its own text, so ids are unique with the text.
//! - A failed write never rolls back the in-memory mutation.

use super::error::{StoreError, StoreResult};
use super::NoteStore;
use crate::model::note::{is_unique_value, Note, NoteDraft, NoteId};
use crate::repo::kv_repo::{KeyValueStore, RepoError};
use async_trait::async_trait;
use log::{error, info};
use std::sync::{Arc, PoisonError, RwLock};

/// Storage key of the serialized note list.
pub const NOTES_KEY: &str = "notes";

/// Write-behind note store.
pub struct LocalNoteStore {
    kv: Arc<dyn KeyValueStore>,
    notes: RwLock<Vec<Note>>,
}

impl LocalNoteStore {
    /// Loads the persisted list; a missing entry yields an empty store.
    pub fn open(kv: Arc<dyn KeyValueStore>) -> StoreResult<Self> {
        let notes = match kv.get(NOTES_KEY)? {
            Some(payload) => {
                serde_json::from_str::<Vec<Note>>(&payload).map_err(RepoError::from)?
            }
            None => Vec::new(),
        };
        info!(
            "event=notes_load module=store status=ok backend=local count={}",
            notes.len()
        );
        Ok(Self {
            kv,
            notes: RwLock::new(notes),
        })
    }

    /// Applies `op` to the list, then persists the result.
    ///
    /// `op` errors abort before anything is written.
    fn mutate<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&mut Vec<Note>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        // Persisting under the lock keeps storage writes in mutation order.
        let mut notes = self.notes.write().unwrap_or_else(PoisonError::into_inner);
        let value = op(&mut notes)?;
        self.persist(event, &notes)?;
        Ok(value)
    }

    fn persist(&self, event: &'static str, notes: &[Note]) -> StoreResult<()> {
        let written = serde_json::to_string(notes)
            .map_err(RepoError::from)
            .and_then(|payload| self.kv.set(NOTES_KEY, &payload));
        match written {
            Ok(()) => {
                info!(
                    "event={event} module=store status=ok backend=local count={}",
                    notes.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event={event} module=store status=error backend=local error_code=persist_failed error={err}"
                );
                Err(StoreError::Storage(err))
            }
        }
    }
}

fn local_key(id: &NoteId) -> String {
    match id {
        NoteId::Local(title) => title.trim().to_string(),
        NoteId::Remote(number) => number.to_string(),
    }
}

fn position(notes: &[Note], id: &NoteId) -> StoreResult<usize> {
    let key = local_key(id);
    notes
        .iter()
        .position(|note| note.value == key)
        .ok_or_else(|| StoreError::NotFound(id.clone()))
}

#[async_trait]
impl NoteStore for LocalNoteStore {
    fn notes(&self) -> Vec<Note> {
        self.notes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn create_note(&self, draft: NoteDraft) -> StoreResult<Note> {
        self.mutate("note_create", |notes| {
            if !is_unique_value(notes, draft.value()) {
                return Err(StoreError::Duplicate(draft.value().to_string()));
            }
            let note = Note {
                id: NoteId::Local(draft.value().to_string()),
                value: draft.value().to_string(),
                details: draft.details().map(str::to_string),
                priority: draft.priority(),
                checked: false,
            };
            notes.push(note.clone());
            Ok(note)
        })
    }

    async fn delete_note(&self, id: &NoteId) -> StoreResult<()> {
        self.mutate("note_delete", |notes| {
            let index = position(notes, id)?;
            notes.remove(index);
            Ok(())
        })
    }

    async fn toggle_done(&self, id: &NoteId) -> StoreResult<Note> {
        self.mutate("note_toggle", |notes| {
            let index = position(notes, id)?;
            notes[index].toggle();
            Ok(notes[index].clone())
        })
    }
}
