//! Note store backed by the remote to-do service.
//!
//! # Responsibility
//! - Sequence login, token persistence and list refresh.
//! - Apply create/delete/toggle to the in-memory list after confirmation.
//!
//! # Invariants
//! - A failed remote call leaves the list and the token unchanged.
//! - Empty or duplicate text never reaches the network.
//! - Log lines carry ids and codes only, never note text or tokens.

use super::error::{StoreError, StoreResult};
use super::{NoteStore, SessionControl};
use crate::model::note::{is_unique_value, Note, NoteDraft, NoteId};
use crate::model::session::Session;
use crate::remote::{CreateNoteBody, TodoApi};
use crate::repo::session_repo::SessionRepository;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::{PoisonError, RwLock};
use std::time::Instant;

/// Optimistic-confirmation note store over a `TodoApi`.
pub struct RemoteNoteStore<A: TodoApi, S: SessionRepository> {
    api: A,
    sessions: S,
    notes: RwLock<Vec<Note>>,
    session: RwLock<Option<Session>>,
}

impl<A: TodoApi, S: SessionRepository> RemoteNoteStore<A, S> {
    /// Creates an empty, unauthenticated store.
    pub fn new(api: A, sessions: S) -> Self {
        Self {
            api,
            sessions,
            notes: RwLock::new(Vec::new()),
            session: RwLock::new(None),
        }
    }

    fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn require_session(&self) -> StoreResult<Session> {
        self.current_session().ok_or(StoreError::NotAuthenticated)
    }

    fn set_session(&self, session: Option<Session>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn with_notes_mut<T>(&self, op: impl FnOnce(&mut Vec<Note>) -> T) -> T {
        let mut notes = self.notes.write().unwrap_or_else(PoisonError::into_inner);
        op(&mut notes)
    }

    fn contains(&self, id: &NoteId) -> bool {
        self.notes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|note| &note.id == id)
    }
}

fn remote_id(id: &NoteId) -> StoreResult<u64> {
    match id {
        NoteId::Remote(number) => Ok(*number),
        NoteId::Local(_) => Err(StoreError::NotFound(id.clone())),
    }
}

fn log_failure(event: &str, started_at: Instant, err: &StoreError) {
    warn!(
        "event={event} module=store status=error backend=remote duration_ms={} error_code={} error={err}",
        started_at.elapsed().as_millis(),
        err.code()
    );
}

#[async_trait]
impl<A: TodoApi, S: SessionRepository> NoteStore for RemoteNoteStore<A, S> {
    fn notes(&self) -> Vec<Note> {
        self.notes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn create_note(&self, draft: NoteDraft) -> StoreResult<Note> {
        let started_at = Instant::now();
        let session = self.require_session()?;
        if !is_unique_value(&self.notes(), draft.value()) {
            return Err(StoreError::Duplicate(draft.value().to_string()));
        }
        if draft.details().is_some() {
            debug!("event=note_create module=store backend=remote details=dropped");
        }

        let body = CreateNoteBody {
            value: draft.value(),
            priority: draft.priority(),
        };
        let created: Note = match self.api.create_note(&session, &body).await {
            Ok(remote) => remote.into(),
            Err(err) => {
                let err = StoreError::Create(err);
                log_failure("note_create", started_at, &err);
                return Err(err);
            }
        };

        // The list may have changed while the request was in flight.
        let appended = self.with_notes_mut(|notes| {
            if is_unique_value(notes, &created.value) {
                notes.push(created.clone());
                true
            } else {
                false
            }
        });
        if !appended {
            let err = StoreError::Duplicate(created.value);
            log_failure("note_create", started_at, &err);
            return Err(err);
        }

        info!(
            "event=note_create module=store status=ok backend=remote id={} duration_ms={}",
            created.id,
            started_at.elapsed().as_millis()
        );
        Ok(created)
    }

    async fn delete_note(&self, id: &NoteId) -> StoreResult<()> {
        let started_at = Instant::now();
        let number = remote_id(id)?;
        let session = self.require_session()?;
        if !self.contains(id) {
            return Err(StoreError::NotFound(id.clone()));
        }

        if let Err(err) = self.api.delete_note(&session, number).await {
            let err = StoreError::Delete(err);
            log_failure("note_delete", started_at, &err);
            return Err(err);
        }

        self.with_notes_mut(|notes| notes.retain(|note| &note.id != id));
        info!(
            "event=note_delete module=store status=ok backend=remote id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    async fn toggle_done(&self, id: &NoteId) -> StoreResult<Note> {
        let started_at = Instant::now();
        let number = remote_id(id)?;
        let session = self.require_session()?;
        if !self.contains(id) {
            return Err(StoreError::NotFound(id.clone()));
        }

        if let Err(err) = self.api.toggle_note(&session, number).await {
            let err = StoreError::Toggle(err);
            log_failure("note_toggle", started_at, &err);
            return Err(err);
        }

        let toggled = self.with_notes_mut(|notes| {
            notes.iter_mut().find(|note| &note.id == id).map(|note| {
                note.toggle();
                note.clone()
            })
        });
        let note = toggled.ok_or_else(|| StoreError::NotFound(id.clone()))?;
        info!(
            "event=note_toggle module=store status=ok backend=remote id={id} checked={} duration_ms={}",
            note.checked,
            started_at.elapsed().as_millis()
        );
        Ok(note)
    }
}

#[async_trait]
impl<A: TodoApi, S: SessionRepository> SessionControl for RemoteNoteStore<A, S> {
    async fn authenticate(&self, credential: &str) -> StoreResult<Session> {
        let started_at = Instant::now();
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(StoreError::EmptyCredential);
        }

        let session = match self.api.login(credential).await {
            Ok(session) => session,
            Err(err) => {
                let err = StoreError::Auth(err);
                log_failure("auth_login", started_at, &err);
                return Err(err);
            }
        };
        self.set_session(Some(session.clone()));

        // The login itself stands even when the token cannot be saved.
        if let Err(err) = self.sessions.save(&session) {
            warn!(
                "event=session_save module=store status=error error_code=session_persist_failed error={err}"
            );
        }
        info!(
            "event=auth_login module=store status=ok backend=remote duration_ms={}",
            started_at.elapsed().as_millis()
        );

        self.refresh().await?;
        Ok(session)
    }

    async fn refresh(&self) -> StoreResult<Vec<Note>> {
        let started_at = Instant::now();
        let session = self.require_session()?;

        let fetched: Vec<Note> = match self.api.list_notes(&session).await {
            Ok(remote) => remote.into_iter().map(Note::from).collect(),
            Err(err) => {
                let err = StoreError::Fetch(err);
                log_failure("notes_refresh", started_at, &err);
                return Err(err);
            }
        };

        self.with_notes_mut(|notes| *notes = fetched.clone());
        info!(
            "event=notes_refresh module=store status=ok backend=remote count={} duration_ms={}",
            fetched.len(),
            started_at.elapsed().as_millis()
        );
        Ok(fetched)
    }

    fn restore_token(&self, token: &str) {
        let token = token.trim();
        if token.is_empty() {
            debug!("event=session_restore module=store status=skipped reason=blank_token");
            return;
        }
        self.set_session(Some(Session::new(token)));
        info!("event=session_restore module=store status=ok");
    }

    fn resume(&self) -> StoreResult<Option<Session>> {
        let saved = self.sessions.load()?;
        if let Some(session) = &saved {
            self.restore_token(session.token());
        }
        Ok(saved)
    }

    fn logout(&self) -> StoreResult<()> {
        self.set_session(None);
        self.with_notes_mut(Vec::clear);
        self.sessions.clear()?;
        info!("event=auth_logout module=store status=ok backend=remote");
        Ok(())
    }

    fn session(&self) -> Option<Session> {
        self.current_session()
    }
}

#[cfg(test)]
mod tests {
    use super::RemoteNoteStore;
    use crate::model::note::{Note, NoteDraft, NoteId, Priority};
    use crate::model::session::Session;
    use crate::remote::{CreateNoteBody, RemoteError, RemoteNote, TodoApi};
    use crate::repo::session_repo::{MemorySessionRepository, SessionRepository};
    use crate::service::error::StoreError;
    use crate::service::{NoteStore, SessionControl};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::Notify;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Held {
        Create,
        Toggle(u64),
    }

    /// Parks one in-flight call until the test releases it.
    #[derive(Default)]
    struct Gate {
        entered: Notify,
        release: Notify,
    }

    /// In-process service double; counts calls and can be told to fail.
    #[derive(Default)]
    struct FakeApi {
        fail: AtomicBool,
        fail_list: AtomicBool,
        calls: AtomicUsize,
        next_id: AtomicU64,
        server: Mutex<Vec<RemoteNote>>,
        hold: Mutex<Option<(Held, Arc<Gate>)>>,
    }

    impl FakeApi {
        fn hold(&self, op: Held) -> Arc<Gate> {
            let gate = Arc::new(Gate::default());
            *self.hold.lock().unwrap() = Some((op, Arc::clone(&gate)));
            gate
        }

        async fn pause_if_held(&self, op: Held) {
            let gate = {
                let slot = self.hold.lock().unwrap();
                match slot.as_ref() {
                    Some((held, gate)) if *held == op => Some(Arc::clone(gate)),
                    _ => None,
                }
            };
            if let Some(gate) = gate {
                gate.entered.notify_one();
                gate.release.notified().await;
            }
        }

        fn check(&self) -> Result<(), RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(RemoteError::Status {
                    status: 500,
                    body: String::new(),
                });
            }
            Ok(())
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TodoApi for FakeApi {
        async fn login(&self, credential: &str) -> Result<Session, RemoteError> {
            self.check()?;
            if credential == "bad-credential" {
                return Err(RemoteError::MissingToken);
            }
            Ok(Session::new(format!("token-for-{credential}")))
        }

        async fn list_notes(&self, _session: &Session) -> Result<Vec<RemoteNote>, RemoteError> {
            self.check()?;
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(RemoteError::Status {
                    status: 500,
                    body: String::new(),
                });
            }
            Ok(self.server.lock().unwrap().clone())
        }

        async fn create_note(
            &self,
            _session: &Session,
            body: &CreateNoteBody<'_>,
        ) -> Result<RemoteNote, RemoteError> {
            self.check()?;
            let note = RemoteNote {
                id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                value: body.value.to_string(),
                priority: body.priority,
                checked: false,
            };
            self.server.lock().unwrap().push(note.clone());
            self.pause_if_held(Held::Create).await;
            Ok(note)
        }

        async fn delete_note(&self, _session: &Session, id: u64) -> Result<(), RemoteError> {
            self.check()?;
            self.server.lock().unwrap().retain(|note| note.id != id);
            Ok(())
        }

        async fn toggle_note(&self, _session: &Session, id: u64) -> Result<(), RemoteError> {
            self.check()?;
            self.pause_if_held(Held::Toggle(id)).await;
            if let Some(note) = self
                .server
                .lock()
                .unwrap()
                .iter_mut()
                .find(|note| note.id == id)
            {
                note.checked = !note.checked;
            }
            Ok(())
        }
    }

    fn store() -> RemoteNoteStore<FakeApi, MemorySessionRepository> {
        let store = RemoteNoteStore::new(FakeApi::default(), MemorySessionRepository::new());
        store.restore_token("token");
        store
    }

    fn draft(text: &str, priority: Priority) -> NoteDraft {
        NoteDraft::new(text, priority).unwrap()
    }

    #[tokio::test]
    async fn create_toggle_delete_scenario() {
        let store = store();

        let created = store
            .create_note(draft("Buy milk", Priority::Medium))
            .await
            .unwrap();
        assert_eq!(
            store.notes(),
            vec![Note {
                id: created.id.clone(),
                value: "Buy milk".to_string(),
                details: None,
                priority: Priority::Medium,
                checked: false,
            }]
        );

        let toggled = store.toggle_done(&created.id).await.unwrap();
        assert!(toggled.checked);

        store.delete_note(&created.id).await.unwrap();
        assert!(store.notes().is_empty());
    }

    #[tokio::test]
    async fn duplicate_text_is_rejected_without_network_call() {
        let store = store();
        store
            .create_note(draft("Buy milk", Priority::Low))
            .await
            .unwrap();
        let calls_before = store.api.calls();

        let err = store
            .create_note(draft(" Buy milk ", Priority::High))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(value) if value == "Buy milk"));
        assert_eq!(store.notes().len(), 1);
        assert_eq!(store.api.calls(), calls_before);
    }

    #[tokio::test]
    async fn failed_create_leaves_list_unchanged() {
        let store = store();
        store.api.fail.store(true, Ordering::SeqCst);

        let err = store
            .create_note(draft("Walk dog", Priority::Low))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Create(_)));
        assert!(store.notes().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_leaves_list_unchanged() {
        let store = store();
        let note = store
            .create_note(draft("Walk dog", Priority::Low))
            .await
            .unwrap();
        store.api.fail.store(true, Ordering::SeqCst);

        let err = store.delete_note(&note.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Delete(_)));
        assert_eq!(store.notes(), vec![note]);
    }

    #[tokio::test]
    async fn toggle_twice_restores_flag_and_failed_toggle_is_reported() {
        let store = store();
        let note = store
            .create_note(draft("Read", Priority::High))
            .await
            .unwrap();

        store.toggle_done(&note.id).await.unwrap();
        let back = store.toggle_done(&note.id).await.unwrap();
        assert!(!back.checked);

        store.api.fail.store(true, Ordering::SeqCst);
        let err = store.toggle_done(&note.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Toggle(_)));
        assert!(!store.notes()[0].checked);
    }

    #[tokio::test]
    async fn toggle_unknown_id_is_not_found_without_network_call() {
        let store = store();
        let err = store.toggle_done(&NoteId::Remote(99)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(NoteId::Remote(99))));
        assert_eq!(store.api.calls(), 0);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found_without_network_call() {
        let store = store();
        let err = store.delete_note(&NoteId::Remote(99)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(NoteId::Remote(99))));
        assert_eq!(store.api.calls(), 0);
    }

    #[tokio::test]
    async fn pending_toggle_does_not_block_other_notes() {
        let store = Arc::new(store());
        let first = store
            .create_note(draft("first", Priority::Low))
            .await
            .unwrap();
        let second = store
            .create_note(draft("second", Priority::Low))
            .await
            .unwrap();
        let NoteId::Remote(first_number) = &first.id else {
            panic!("remote store returned a local id");
        };
        let gate = store.api.hold(Held::Toggle(*first_number));

        let pending = tokio::spawn({
            let store = Arc::clone(&store);
            let id = first.id.clone();
            async move { store.toggle_done(&id).await }
        });
        gate.entered.notified().await;

        let toggled = tokio::time::timeout(Duration::from_secs(1), store.toggle_done(&second.id))
            .await
            .expect("second toggle was blocked by the pending one")
            .unwrap();
        assert!(toggled.checked);
        assert_eq!(store.notes().len(), 2);
        assert!(!store.notes()[0].checked);
        assert!(!pending.is_finished());

        gate.release.notify_one();
        let first_toggled = pending.await.unwrap().unwrap();
        assert!(first_toggled.checked);
        assert!(store.notes().iter().all(|note| note.checked));
    }

    #[tokio::test]
    async fn duplicate_arriving_during_create_is_rejected_on_append() {
        let store = Arc::new(store());
        let gate = store.api.hold(Held::Create);

        let pending = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.create_note(draft("Buy milk", Priority::High)).await }
        });
        gate.entered.notified().await;

        // A refresh lands while the POST is still in flight.
        store.refresh().await.unwrap();
        assert_eq!(store.notes().len(), 1);

        gate.release.notify_one();
        let err = pending.await.unwrap().unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(value) if value == "Buy milk"));
        assert_eq!(store.notes().len(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_after_login_keeps_session() {
        let store = RemoteNoteStore::new(FakeApi::default(), MemorySessionRepository::new());
        store.api.fail_list.store(true, Ordering::SeqCst);

        let err = store.authenticate("ann").await.unwrap_err();
        assert!(matches!(err, StoreError::Fetch(_)));
        assert!(store.is_authenticated());
        assert_eq!(store.sessions.load().unwrap(), store.session());
    }

    #[tokio::test]
    async fn operations_without_session_are_rejected() {
        let store = RemoteNoteStore::new(FakeApi::default(), MemorySessionRepository::new());
        let err = store.refresh().await.unwrap_err();
        assert!(matches!(err, StoreError::NotAuthenticated));
        let err = store
            .create_note(draft("x", Priority::Low))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotAuthenticated));
        assert_eq!(store.api.calls(), 0);
    }

    #[tokio::test]
    async fn authenticate_persists_token_and_refreshes() {
        let api = FakeApi::default();
        api.server.lock().unwrap().push(RemoteNote {
            id: 5,
            value: "server note".to_string(),
            priority: Priority::High,
            checked: true,
        });
        let store = RemoteNoteStore::new(api, MemorySessionRepository::new());

        let session = store.authenticate(" ann@example.comsecret ").await.unwrap();
        assert_eq!(session.token(), "token-for-ann@example.comsecret");
        assert_eq!(store.sessions.load().unwrap(), Some(session));
        assert_eq!(store.notes().len(), 1);
        assert_eq!(store.notes()[0].id, NoteId::Remote(5));
    }

    #[tokio::test]
    async fn bad_credential_leaves_token_unset_and_skips_refresh() {
        let store = RemoteNoteStore::new(FakeApi::default(), MemorySessionRepository::new());

        let err = store.authenticate("bad-credential").await.unwrap_err();
        assert!(matches!(err, StoreError::Auth(_)));
        assert!(!store.is_authenticated());
        assert_eq!(store.api.calls(), 1);
    }

    #[tokio::test]
    async fn blank_credential_is_rejected_locally() {
        let store = RemoteNoteStore::new(FakeApi::default(), MemorySessionRepository::new());
        let err = store.authenticate("   ").await.unwrap_err();
        assert!(matches!(err, StoreError::EmptyCredential));
        assert_eq!(store.api.calls(), 0);
    }

    #[tokio::test]
    async fn logout_clears_memory_and_saved_session() {
        let store = RemoteNoteStore::new(FakeApi::default(), MemorySessionRepository::new());
        store.authenticate("ann").await.unwrap();
        store
            .create_note(draft("x", Priority::Low))
            .await
            .unwrap();

        store.logout().unwrap();
        assert!(!store.is_authenticated());
        assert!(store.notes().is_empty());
        assert_eq!(store.sessions.load().unwrap(), None);
        assert_eq!(store.resume().unwrap(), None);
    }

    #[test]
    fn resume_restores_saved_token() {
        let sessions = MemorySessionRepository::new();
        sessions.save(&Session::new("saved")).unwrap();
        let store = RemoteNoteStore::new(FakeApi::default(), sessions);

        assert_eq!(store.resume().unwrap(), Some(Session::new("saved")));
        assert_eq!(store.session(), Some(Session::new("saved")));
    }
}
