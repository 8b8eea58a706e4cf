//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller's identity from a session token.

pub mod auth;
