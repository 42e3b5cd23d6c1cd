// src/services/auth.rs

//! Admin login and session guard.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::error::{AppError, Result};
use crate::storage::{Session, SessionStorage};

const LOGIN_FAILED: &str = "Login gagal";

pub struct AuthService {
    api: ApiClient,
    session: Arc<dyn SessionStorage>,
}

impl AuthService {
    pub fn new(api: ApiClient, session: Arc<dyn SessionStorage>) -> Self {
        Self { api, session }
    }

    /// Exchange credentials for a token and persist the session.
    ///
    /// A refused login is a remote error carrying the service's message.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let result = self.api.login(username, password).await?;

        match result.token.filter(|t| !t.is_empty()) {
            Some(token) if result.success => {
                let session = Session::logged_in(token);
                self.session.save(&session).await?;
                log::info!("Logged in as {username}");
                Ok(session)
            }
            _ => {
                let message = result
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| LOGIN_FAILED.to_string());
                log::warn!("Login refused for {username}: {message}");
                Err(AppError::remote("login", message))
            }
        }
    }

    pub async fn logout(&self) -> Result<()> {
        self.session.clear().await?;
        log::info!("Logged out");
        Ok(())
    }

    /// Whether the admin area may be entered.
    pub async fn is_logged_in(&self) -> Result<bool> {
        Ok(self.session.load().await?.is_authenticated())
    }

    pub async fn session(&self) -> Result<Session> {
        self.session.load().await
    }
}
