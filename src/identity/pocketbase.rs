//! PocketBase identity provider client.
//!
//! Talks to the `auth-with-password` and `auth-refresh` endpoints of a
//! PocketBase auth collection. The client holds no per-user state: the
//! token to refresh is passed in on every call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{AuthSession, AuthUser, IdentityError, IdentityProvider};
use crate::domain::UserId;

/// PocketBase auth record, reduced to the fields the gateway uses.
#[derive(Debug, Deserialize)]
struct AuthRecord {
    id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    created: Option<String>,
    #[serde(default)]
    updated: Option<String>,
}

/// Body of a successful auth response.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    record: AuthRecord,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<AuthResponse> for AuthSession {
    fn from(resp: AuthResponse) -> Self {
        let record = resp.record;
        Self {
            user: AuthUser {
                id: UserId::from(record.id),
                email: record.email,
                name: non_empty(record.name).or_else(|| non_empty(record.username)),
                avatar: non_empty(record.avatar),
                created: record.created,
                updated: record.updated,
            },
            token: resp.token,
        }
    }
}

/// HTTP client for a PocketBase users collection.
#[derive(Debug, Clone)]
pub struct PocketBaseClient {
    client: reqwest::Client,
    base_url: String,
    collection: String,
}

impl PocketBaseClient {
    /// Creates a client for `base_url` (e.g. `http://127.0.0.1:8090`) and
    /// the given auth collection.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Unavailable`] if the HTTP client cannot be
    /// built.
    pub fn new(
        base_url: impl Into<String>,
        collection: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/api/collections/{}/{action}",
            self.base_url, self.collection
        )
    }

    async fn read_session(response: reqwest::Response) -> Result<AuthSession, IdentityError> {
        response
            .json::<AuthResponse>()
            .await
            .map(AuthSession::from)
            .map_err(|e| IdentityError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for PocketBaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError> {
        let response = self
            .client
            .post(self.endpoint("auth-with-password"))
            .json(&serde_json::json!({ "identity": email, "password": password }))
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        match response.status() {
            s if s.is_success() => Self::read_session(response).await,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                Err(IdentityError::InvalidCredentials)
            }
            other => {
                tracing::warn!(status = other.as_u16(), "identity provider sign-in failed");
                Err(IdentityError::Unavailable(format!("status {}", other.as_u16())))
            }
        }
    }

    async fn refresh(&self, token: &str) -> Result<AuthSession, IdentityError> {
        let response = self
            .client
            .post(self.endpoint("auth-refresh"))
            .header(reqwest::header::AUTHORIZATION, token)
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        match response.status() {
            s if s.is_success() => Self::read_session(response).await,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                Err(IdentityError::InvalidToken)
            }
            other => {
                tracing::warn!(status = other.as_u16(), "identity provider refresh failed");
                Err(IdentityError::Unavailable(format!("status {}", other.as_u16())))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};

    fn record_body(token: &str) -> serde_json::Value {
        serde_json::json!({
            "token": token,
            "record": {
                "id": "abc123def456ghi",
                "email": "ann@example.com",
                "name": "",
                "username": "ann",
                "avatar": "",
                "created": "2026-01-01 10:00:00.000Z",
                "updated": "2026-01-02 10:00:00.000Z"
            }
        })
    }

    async fn sign_in_handler(Json(body): Json<serde_json::Value>) -> axum::response::Response {
        use axum::response::IntoResponse;
        if body["identity"] == "ann@example.com" && body["password"] == "secret123" {
            Json(record_body("tok-1")).into_response()
        } else {
            (
                axum::http::StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "message": "Failed to authenticate." })),
            )
                .into_response()
        }
    }

    async fn refresh_handler(headers: HeaderMap) -> axum::response::Response {
        use axum::response::IntoResponse;
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some("tok-1") => Json(record_body("tok-2")).into_response(),
            Some("tok-2") => Json(record_body("tok-2")).into_response(),
            _ => axum::http::StatusCode::UNAUTHORIZED.into_response(),
        }
    }

    async fn client() -> PocketBaseClient {
        let router = Router::new()
            .route(
                "/api/collections/users/auth-with-password",
                post(sign_in_handler),
            )
            .route("/api/collections/users/auth-refresh", post(refresh_handler));
        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        let Ok(client) =
            PocketBaseClient::new(format!("http://{addr}/"), "users", Duration::from_secs(2))
        else {
            panic!("client build failed");
        };
        client
    }

    #[tokio::test]
    async fn sign_in_maps_record() {
        let pb = client().await;
        let Ok(session) = pb.sign_in("ann@example.com", "secret123").await else {
            panic!("sign-in failed");
        };
        assert_eq!(session.token, "tok-1");
        assert_eq!(session.user.id, UserId::from("abc123def456ghi"));
        assert_eq!(session.user.name.as_deref(), Some("ann"));
        assert!(session.user.avatar.is_none());
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let pb = client().await;
        let result = pb.sign_in("ann@example.com", "nope").await;
        assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn verify_reports_rotation() {
        let pb = client().await;
        let Ok(rotated) = pb.verify("tok-1").await else {
            panic!("verify failed");
        };
        assert_eq!(rotated.rotated_token.as_deref(), Some("tok-2"));

        let Ok(same) = pb.verify("tok-2").await else {
            panic!("verify failed");
        };
        assert!(same.rotated_token.is_none());
    }

    #[tokio::test]
    async fn rejected_token_is_invalid() {
        let pb = client().await;
        let result = pb.verify("bogus").await;
        assert!(matches!(result, Err(IdentityError::InvalidToken)));
    }

    #[tokio::test]
    async fn unreachable_provider_is_unavailable() {
        let Ok(pb) = PocketBaseClient::new("http://127.0.0.1:1", "users", Duration::from_secs(1))
        else {
            panic!("client build failed");
        };
        let result = pb.refresh("tok").await;
        assert!(matches!(result, Err(IdentityError::Unavailable(_))));
    }
}
