//! Authentication helpers
//!
//! Bearer token parsing, the shared admin token check, password hashing, and
//! opaque session tokens for businesses.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::http::{header, HeaderMap};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::models::Id;

/// Authentication-related errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Password task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Who is making a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// Holder of the shared admin token
    Admin,
    /// A business authenticated with a session token
    Business(Id),
    Anonymous,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn business_id(&self) -> Option<Id> {
        match self {
            Self::Business(id) => Some(*id),
            _ => None,
        }
    }

    /// Admin, or the business that owns the row
    pub fn is_admin_or_owner(&self, owner: Id) -> bool {
        match self {
            Self::Admin => true,
            Self::Business(id) => *id == owner,
            Self::Anonymous => false,
        }
    }
}

/// Token from the Authorization header.
///
/// Accepts `Bearer xxx`, `bearer xxx`, or a raw token.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let mut parts = value.splitn(2, ' ');
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => {
            let token = token.trim();
            (!token.is_empty()).then_some(token)
        }
        _ => Some(value),
    }
}

/// Constant-time comparison against the configured admin token
pub fn is_admin_token(candidate: &str, admin_token: &str) -> bool {
    !admin_token.is_empty() && bool::from(candidate.as_bytes().ct_eq(admin_token.as_bytes()))
}

/// Hash a password into an argon2 PHC string
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Check a password against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// [`hash_password`] on the blocking thread pool
pub async fn spawn_hash_password(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

/// [`verify_password`] on the blocking thread pool
pub async fn spawn_verify_password(
    password: String,
    password_hash: String,
) -> Result<bool, AuthError> {
    Ok(tokio::task::spawn_blocking(move || verify_password(&password, &password_hash)).await?)
}

/// New opaque session token
pub fn new_session_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
