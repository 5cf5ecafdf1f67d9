//! REST API client module for the authentication backend.
//!
//! This module provides the `AuthApi` seam used by the session state and
//! `ApiClient`, its reqwest implementation. Login exchanges an email and
//! password for an access/refresh token pair; the access token is then sent
//! as a bearer token to fetch the current user's profile.

pub mod client;
pub mod error;

pub use client::{ApiClient, AuthApi, TokenPair};
pub use error::ApiError;
