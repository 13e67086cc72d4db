//! Session persistence contracts.
//!
//! # Responsibility
//! - Decouple where a bearer token is kept from the stores that use it.
//!
//! # Invariants
//! - `load` after `clear` returns `None`.
//! - Stored tokens are never logged.

use crate::model::session::Session;
use crate::repo::kv_repo::{KeyValueStore, RepoError, RepoResult};
use log::debug;
use std::sync::{Arc, Mutex};

/// Fixed storage key for the saved bearer token.
pub const SESSION_KEY: &str = "userToken";

/// Persistence policy for the current session.
pub trait SessionRepository: Send + Sync {
    fn load(&self) -> RepoResult<Option<Session>>;
    fn save(&self, session: &Session) -> RepoResult<()>;
    fn clear(&self) -> RepoResult<()>;
}

/// Which key a saved token lives under.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionScope {
    /// One token per data directory, under `userToken`.
    #[default]
    Shared,
    /// One token per login name, under `userToken:<login>`.
    PerLogin(String),
}

impl SessionScope {
    pub fn storage_key(&self) -> String {
        match self {
            Self::Shared => SESSION_KEY.to_string(),
            Self::PerLogin(login) => format!("{SESSION_KEY}:{}", login.trim()),
        }
    }
}

/// Session repository on top of durable key-value storage.
pub struct KvSessionRepository {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl KvSessionRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>, scope: &SessionScope) -> Self {
        Self {
            kv,
            key: scope.storage_key(),
        }
    }
}

impl SessionRepository for KvSessionRepository {
    fn load(&self) -> RepoResult<Option<Session>> {
        let token = self
            .kv
            .get(&self.key)?
            .filter(|token| !token.trim().is_empty());
        debug!(
            "event=session_load module=repo status=ok found={}",
            token.is_some()
        );
        Ok(token.map(Session::new))
    }

    fn save(&self, session: &Session) -> RepoResult<()> {
        self.kv.set(&self.key, session.token())
    }

    fn clear(&self) -> RepoResult<()> {
        self.kv.remove(&self.key)
    }
}

/// Process-lifetime session storage; nothing survives a restart.
#[derive(Default)]
pub struct MemorySessionRepository {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for MemorySessionRepository {
    fn load(&self) -> RepoResult<Option<Session>> {
        let slot = self.slot.lock().map_err(|_| RepoError::Poisoned)?;
        Ok(slot.clone())
    }

    fn save(&self, session: &Session) -> RepoResult<()> {
        let mut slot = self.slot.lock().map_err(|_| RepoError::Poisoned)?;
        *slot = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> RepoResult<()> {
        let mut slot = self.slot.lock().map_err(|_| RepoError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}
