//! Core library for authstore.
//!
//! Holds the client-side authentication session (`AuthState`) for a REST
//! backend, persisting the access and refresh tokens between runs, plus a
//! small toast helper (`Notifier`) for surfacing outcomes to the user.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod notify;
pub mod storage;
pub mod utils;

pub use api::{ApiClient, ApiError, AuthApi, TokenPair};
pub use auth::{AuthState, AuthStatus, FetchOutcome, Session};
pub use config::{Config, StorageBackend};
pub use models::{Credentials, User};
pub use notify::{Notifier, Toast, ToastKind, ToastOptions, ToastOverrides};
pub use storage::{FileStorage, KeyringStorage, MemoryStorage, Storage};
