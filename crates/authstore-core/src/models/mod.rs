//! Data models exchanged with the authentication backend.
//!
//! - `Credentials`: transient login input, never persisted
//! - `User`: the current user's profile as returned by the backend

pub mod user;

pub use user::{Credentials, User};
