//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type. Each variant maps to one HTTP
//! status and to the JSON body every error response shares:
//!
//! ```json
//! {
//!   "message": "invalid bet data",
//!   "errors": { "odds": ["must be a positive number"] }
//! }
//! ```

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{EventId, EventStatus};
use crate::identity::IdentityError;
use crate::oracle::OracleError;

/// Per-field validation messages, keyed by the request field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// JSON error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub message: String,
    /// Field-level details for structural validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Class                | HTTP status |
/// |----------------------|-------------|
/// | Structural / policy  | 400         |
/// | Authentication       | 401         |
/// | Not found            | 404         |
/// | Conflict             | 409         |
/// | Storage / internal   | 500         |
/// | Upstream             | 502         |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body is malformed or missing required fields.
    #[error("{message}")]
    Validation {
        /// Summary message.
        message: String,
        /// Per-field messages.
        errors: FieldErrors,
    },

    /// Request body could not be decoded.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Stake is well-formed but violates the staking rules.
    #[error("{0}")]
    StakePolicy(String),

    /// Wallet balance does not cover the stake.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// The event id is not present in the events feed.
    #[error("event {0} not found")]
    EventNotFound(EventId),

    /// The event exists but is not open for betting.
    #[error("event {event_id} is {status} and does not accept bets")]
    EventClosed {
        /// Event that was targeted.
        event_id: EventId,
        /// Status reported by the feed.
        status: EventStatus,
    },

    /// Missing, invalid or expired credential.
    #[error("{0}")]
    Unauthorized(String),

    /// Bet with the given id does not exist.
    #[error("bet {0} not found")]
    BetNotFound(i64),

    /// Wallet for the given user does not exist.
    #[error("wallet not found for user {0}")]
    WalletNotFound(String),

    /// Operation conflicts with the current state of a record.
    #[error("{0}")]
    Conflict(String),

    /// Events feed or identity provider failed.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Builds a [`ApiError::Validation`] from collected field messages.
    #[must_use]
    pub fn validation(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self::Validation {
            message: message.into(),
            errors,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. }
            | Self::InvalidRequest(_)
            | Self::StakePolicy(_)
            | Self::InsufficientFunds
            | Self::EventClosed { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::EventNotFound(_) | Self::BetNotFound(_) | Self::WalletNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the client. Server-side failures get a generic
    /// text; the detail only goes to the log.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Upstream(_) => "upstream service unavailable".to_string(),
            Self::Persistence(_) | Self::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        let message = self.public_message();
        let errors = match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        };
        let mut response = axum::Json(ErrorResponse { message, errors }).into_response();
        *response.status_mut() = status;
        response
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<OracleError> for ApiError {
    fn from(err: OracleError) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials => {
                Self::Unauthorized("invalid email or password".to_string())
            }
            IdentityError::InvalidToken => Self::Unauthorized("invalid token".to_string()),
            IdentityError::Unavailable(detail) | IdentityError::Malformed(detail) => {
                Self::Upstream(format!("identity provider: {detail}"))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        let Ok(json) = serde_json::from_slice(&bytes) else {
            panic!("body should be JSON");
        };
        (status, json)
    }

    #[test]
    fn status_codes_follow_error_class() {
        assert_eq!(ApiError::InsufficientFunds.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::StakePolicy("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::EventNotFound(EventId::new(1)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Upstream("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::Persistence("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn validation_error_carries_field_map() {
        let mut errors = FieldErrors::new();
        errors.insert("odds".into(), vec!["must be a positive number".into()]);
        let (status, json) = body_json(ApiError::validation("invalid bet data", errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "invalid bet data");
        assert_eq!(json["errors"]["odds"][0], "must be a positive number");
    }

    #[tokio::test]
    async fn server_errors_hide_details() {
        let (status, json) =
            body_json(ApiError::Persistence("connection refused on 10.0.0.3".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "internal server error");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn identity_errors_map_to_auth_or_upstream() {
        let invalid: ApiError = IdentityError::InvalidToken.into();
        assert_eq!(invalid.status_code(), StatusCode::UNAUTHORIZED);
        let down: ApiError = IdentityError::Unavailable("timeout".into()).into();
        assert_eq!(down.status_code(), StatusCode::BAD_GATEWAY);
    }
}
