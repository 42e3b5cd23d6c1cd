//! Durable admin session persistence.
//!
//! The session mirrors what a browser keeps in local storage: a "logged in"
//! flag and the bearer token attached to every write.
//!
//! ```text
//! .masjid-site/
//! └── session.json     # { "logged_in": true, "token": "..." }
//! ```

pub mod local;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// Re-export for convenience
pub use local::FileSessionStorage;
pub use memory::MemorySessionStorage;

/// Persisted admin session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Session {
    #[serde(default)]
    pub logged_in: bool,

    #[serde(default)]
    pub token: Option<String>,
}

impl Session {
    /// A fresh logged-in session for `token`.
    pub fn logged_in(token: impl Into<String>) -> Self {
        Self {
            logged_in: true,
            token: Some(token.into()),
        }
    }

    /// Guard check for admin routes: flag set and a non-empty token.
    pub fn is_authenticated(&self) -> bool {
        self.logged_in && self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Token to attach to writes, empty when absent.
    pub fn bearer(&self) -> &str {
        self.token.as_deref().unwrap_or("")
    }
}

/// Trait for session storage backends.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Load the session. A missing session is the default (logged out) one.
    async fn load(&self) -> Result<Session>;

    /// Replace the stored session.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Forget the stored session.
    async fn clear(&self) -> Result<()>;
}
