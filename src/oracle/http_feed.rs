//! HTTP client for the events feed.

use std::time::Duration;

use async_trait::async_trait;

use super::{EventOracle, OracleError};

/// Events feed reached over HTTP with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpEventFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpEventFeed {
    /// Creates a feed client for `url` (the full `/events` URL).
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Unreachable`] if the HTTP client cannot be
    /// built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Unreachable(e.to_string()))?;
        Ok(Self::with_client(client, url))
    }

    /// Creates a feed client sharing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl EventOracle for HttpEventFeed {
    async fn fetch_feed(&self) -> Result<serde_json::Value, OracleError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            tracing::warn!(url = %self.url, error = %e, "events feed request failed");
            OracleError::Unreachable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, status = status.as_u16(), "events feed error status");
            return Err(OracleError::Status(status.as_u16()));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| OracleError::Malformed(e.to_string()))
    }
}
