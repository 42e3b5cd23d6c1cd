//! In-memory session storage for tests and ephemeral hosts.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::storage::{Session, SessionStorage};

#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    session: Mutex<Session>,
}

impl MemorySessionStorage {
    pub fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> Result<R> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| AppError::session("session lock poisoned"))?;
        Ok(f(&mut guard))
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load(&self) -> Result<Session> {
        self.with(|s| s.clone())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        self.with(|s| *s = session.clone())
    }

    async fn clear(&self) -> Result<()> {
        self.with(|s| *s = Session::default())
    }
}
