//! Bearer-token extractors.
//!
//! Tokens are verified against the identity provider on every request.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::app_state::AppState;
use crate::domain::UserId;
use crate::error::ApiError;

/// The raw token from an `Authorization: Bearer <token>` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    /// Parses an `Authorization` header value. The scheme is matched
    /// case-insensitively; an empty token is treated as absent.
    #[must_use]
    pub fn parse(header: &str) -> Option<Self> {
        let (scheme, token) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        let token = token.trim();
        (!token.is_empty()).then(|| Self(token.to_string()))
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(Self::parse)
            .ok_or_else(|| ApiError::Unauthorized("authorization required".to_string()))
    }
}

/// A caller whose token the identity provider accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    /// Verified user id.
    pub user_id: UserId,
    /// Display name reported by the provider.
    pub display_name: Option<String>,
    /// Replacement token when the provider rotated the credential.
    pub rotated_token: Option<String>,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let verified = state.identity.verify(&token).await?;
        Ok(Self {
            user_id: verified.user_id,
            display_name: verified.display_name,
            rotated_token: verified.rotated_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bearer_header() {
        assert_eq!(
            BearerToken::parse("Bearer abc.def"),
            Some(BearerToken("abc.def".into()))
        );
        assert_eq!(
            BearerToken::parse("bearer   tok "),
            Some(BearerToken("tok".into()))
        );
    }

    #[test]
    fn rejects_other_schemes_and_blank_tokens() {
        assert_eq!(BearerToken::parse("Basic dXNlcjpwYXNz"), None);
        assert_eq!(BearerToken::parse("Bearer "), None);
        assert_eq!(BearerToken::parse("Bearer"), None);
        assert_eq!(BearerToken::parse(""), None);
    }
}
