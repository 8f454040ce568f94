//! Identity verification delegated to an external provider.
//!
//! The gateway never issues or signs credentials. Passwords and session
//! tokens are checked by an [`IdentityProvider`] on every request; no
//! local session cache exists.

pub mod pocketbase;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::UserId;

pub use pocketbase::PocketBaseClient;

/// Failure reported by the identity provider.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Email/password pair rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token rejected, expired, or its user no longer exists.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Provider unreachable or answered with an unexpected status.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// Provider answered with an unexpected body.
    #[error("identity provider returned a malformed body: {0}")]
    Malformed(String),
}

/// Public profile of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthUser {
    /// Provider record id.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Display name (provider `name`, falling back to `username`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Account creation time as reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Account update time as reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

/// A user together with a currently valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Authenticated user.
    pub user: AuthUser,
    /// Token to use on subsequent requests.
    pub token: String,
}

/// Outcome of verifying a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Stable user id.
    pub user_id: UserId,
    /// Display name, if the provider has one.
    pub display_name: Option<String>,
    /// Replacement token when the provider rotated the credential.
    pub rotated_token: Option<String>,
}

/// External authority for passwords and session tokens.
#[async_trait]
pub trait IdentityProvider: Send + Sync + fmt::Debug {
    /// Exchanges an email/password pair for a session.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidCredentials`] when the pair is
    /// rejected, or [`IdentityError::Unavailable`] /
    /// [`IdentityError::Malformed`] when the provider misbehaves.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError>;

    /// Revalidates a token, possibly issuing a new one.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidToken`] when the token is rejected,
    /// or [`IdentityError::Unavailable`] / [`IdentityError::Malformed`]
    /// when the provider misbehaves.
    async fn refresh(&self, token: &str) -> Result<AuthSession, IdentityError>;

    /// Resolves a bearer token to a user id.
    ///
    /// # Errors
    ///
    /// Same as [`IdentityProvider::refresh`].
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let session = self.refresh(token).await?;
        let rotated_token = (session.token != token).then_some(session.token);
        Ok(VerifiedIdentity {
            user_id: session.user.id,
            display_name: session.user.name,
            rotated_token,
        })
    }
}
