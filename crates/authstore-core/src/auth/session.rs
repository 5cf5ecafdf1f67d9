use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::User;
use crate::storage::Storage;

/// Storage key holding the access token
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStatus {
    Anonymous,
    Authenticated,
}

/// In-memory session. Empty strings mean "no token".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<User>,
    pub token: String,
    pub refresh_token: String,
}

impl Session {
    /// Load the persisted tokens. Missing keys become empty strings and the
    /// user is always unset until fetched.
    pub fn load(storage: &dyn Storage) -> Result<Self> {
        let token = storage
            .get(TOKEN_KEY)
            .context("Failed to read access token from storage")?
            .unwrap_or_default();
        let refresh_token = storage
            .get(REFRESH_TOKEN_KEY)
            .context("Failed to read refresh token from storage")?
            .unwrap_or_default();

        Ok(Self {
            user: None,
            token,
            refresh_token,
        })
    }

    /// Write both tokens to storage
    pub fn persist_tokens(&self, storage: &mut dyn Storage) -> Result<()> {
        storage
            .set(TOKEN_KEY, &self.token)
            .context("Failed to persist access token")?;
        storage
            .set(REFRESH_TOKEN_KEY, &self.refresh_token)
            .context("Failed to persist refresh token")?;
        Ok(())
    }

    /// Remove both token keys from storage
    pub fn clear_storage(storage: &mut dyn Storage) -> Result<()> {
        let token = storage
            .remove(TOKEN_KEY)
            .context("Failed to remove access token");
        let refresh = storage
            .remove(REFRESH_TOKEN_KEY)
            .context("Failed to remove refresh token");
        token.and(refresh)
    }

    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn status(&self) -> AuthStatus {
        if self.has_token() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        }
    }
}
