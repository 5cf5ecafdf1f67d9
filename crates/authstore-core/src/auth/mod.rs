//! Authentication module for managing the client session.
//!
//! This module provides:
//! - `Session`: the user profile plus access and refresh tokens
//! - `AuthState`: login, fetch-user and logout actions over an injected
//!   `AuthApi` and `Storage`
//!
//! Tokens are persisted under the `token` and `refresh_token` storage keys
//! and restored when a new `AuthState` is created.

pub mod session;
pub mod state;

pub use session::{AuthStatus, Session, REFRESH_TOKEN_KEY, TOKEN_KEY};
pub use state::{AuthState, FetchOutcome};
