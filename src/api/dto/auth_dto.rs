//! Authentication request and response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ApiError, FieldErrors};
use crate::identity::{AuthSession, AuthUser};

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Account email.
    #[serde(default)]
    #[schema(example = "player@example.com")]
    pub email: Option<String>,
    /// Account password.
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns the trimmed email and the password, or the fields that are
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] naming every absent field.
    pub fn credentials(&self) -> Result<(&str, &str), ApiError> {
        let email = self.email.as_deref().map(str::trim).unwrap_or_default();
        let password = self.password.as_deref().unwrap_or_default();

        let mut errors = FieldErrors::new();
        if email.is_empty() {
            errors.insert("email".into(), vec!["is required".into()]);
        }
        if password.is_empty() {
            errors.insert("password".into(), vec!["is required".into()]);
        }
        if errors.is_empty() {
            Ok((email, password))
        } else {
            Err(ApiError::validation("email and password are required", errors))
        }
    }
}

/// A user profile plus the token to use from now on.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Authenticated user.
    pub user: AuthUser,
    /// Bearer token.
    pub token: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.user,
            token: session.token,
        }
    }
}

/// Plain confirmation message.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}
