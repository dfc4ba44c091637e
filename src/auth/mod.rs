//! Caller authentication.
//!
//! The gateway only sees the [`CredentialVerifier`] trait, so the shared-secret
//! check can be replaced by a real scheme without touching the handler.

pub mod bearer;

use axum::http::HeaderMap;

pub use bearer::StaticBearerToken;

/// Decides whether a request carries an acceptable credential.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, headers: &HeaderMap) -> bool;
}
