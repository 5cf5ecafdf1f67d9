//! Session context: login, fetch-user and logout over injected services.
//!
//! `AuthState` owns the in-memory `Session` and keeps its tokens equal to
//! the last values written to storage. Every action takes `&mut self`, so a
//! single owner drives the session and actions never interleave.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use super::session::{AuthStatus, Session};
use crate::api::{AuthApi, TokenPair};
use crate::models::{Credentials, User};
use crate::notify::Notifier;
use crate::storage::Storage;

/// Result of `AuthState::fetch_user`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No token held, no request sent
    Skipped,
    /// Profile stored
    Loaded,
    /// The request failed and the session was logged out
    SessionCleared,
}

pub struct AuthState<A, S> {
    api: A,
    storage: S,
    session: Session,
    notifier: Option<Arc<Notifier>>,
}

impl<A: AuthApi, S: Storage> AuthState<A, S> {
    /// Create the session context, restoring any persisted tokens
    pub fn new(api: A, storage: S) -> Result<Self> {
        let session = Session::load(&storage)?;
        debug!(status = ?session.status(), "Session restored from storage");

        Ok(Self {
            api,
            storage,
            session,
            notifier: None,
        })
    }

    /// Surface login failures as error toasts
    pub fn with_notifier(mut self, notifier: Arc<Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Exchange credentials for tokens, persist them, then fetch the user.
    ///
    /// A rejected login returns the API error and leaves the session as it
    /// was. The returned status reflects the session after the user fetch,
    /// which logs out again if the new token cannot load a profile.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthStatus> {
        let credentials = Credentials::new(email, password);

        let tokens = match self.api.login(&credentials).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, email = %credentials.email, "Login failed");
                self.surface_error(&e);
                return Err(e);
            }
        };

        self.store_tokens(tokens)?;
        info!(email = %credentials.email, "Login successful");

        self.fetch_user().await?;
        Ok(self.status())
    }

    /// Load the profile for the held token.
    ///
    /// Any failure is treated as an invalid session and logs out. The only
    /// error returned is a storage failure during that logout.
    pub async fn fetch_user(&mut self) -> Result<FetchOutcome> {
        if !self.session.has_token() {
            debug!("No access token, skipping user fetch");
            return Ok(FetchOutcome::Skipped);
        }

        match self.api.fetch_user(&self.session.token).await {
            Ok(user) => {
                debug!(user_id = ?user.id(), "User loaded");
                self.session.user = Some(user);
                Ok(FetchOutcome::Loaded)
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch user, clearing session");
                self.logout()?;
                Ok(FetchOutcome::SessionCleared)
            }
        }
    }

    /// Forget the user and both tokens, in memory and in storage.
    /// Memory is always cleared, even when removing the keys fails.
    pub fn logout(&mut self) -> Result<()> {
        self.session = Session::default();
        Session::clear_storage(&mut self.storage)?;
        info!("Logged out");
        Ok(())
    }

    /// Renewing the access token with the refresh token is not supported;
    /// this leaves the session untouched.
    pub fn refresh_access_token(&mut self) -> Result<()> {
        debug!("Token refresh requested but not supported, ignoring");
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub fn token(&self) -> &str {
        &self.session.token
    }

    pub fn refresh_token(&self) -> &str {
        &self.session.refresh_token
    }

    pub fn status(&self) -> AuthStatus {
        self.session.status()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == AuthStatus::Authenticated
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Persist a fresh token pair, then adopt it in memory. The user is reset
    /// since it belonged to the previous token.
    fn store_tokens(&mut self, tokens: TokenPair) -> Result<()> {
        let next = Session {
            user: None,
            token: tokens.access,
            refresh_token: tokens.refresh,
        };

        if let Err(e) = next.persist_tokens(&mut self.storage) {
            warn!(error = %e, "Failed to persist tokens, restoring previous session");
            self.restore_persisted();
            return Err(e);
        }

        self.session = next;
        Ok(())
    }

    /// Put storage back in line with the in-memory session after a partial
    /// write. Falls back to an empty session if that also fails.
    fn restore_persisted(&mut self) {
        let restored = if self.session.has_token() {
            self.session.persist_tokens(&mut self.storage)
        } else {
            Session::clear_storage(&mut self.storage)
        };

        if let Err(e) = restored {
            warn!(error = %e, "Failed to restore previous tokens, clearing session");
            self.session = Session::default();
            if let Err(e) = Session::clear_storage(&mut self.storage) {
                warn!(error = %e, "Failed to clear token storage");
            }
        }
    }

    fn surface_error(&self, error: &anyhow::Error) {
        if let Some(ref notifier) = self.notifier {
            notifier.error(&format!("{:#}", error));
        }
    }
}
