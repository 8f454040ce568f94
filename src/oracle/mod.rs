//! Event Status Oracle: read-only access to the upstream events feed.
//!
//! The feed is the source of truth for whether an event still accepts
//! bets. It is consulted on every placement and never cached.

pub mod http_feed;

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{EventId, SportEvent};

pub use http_feed::HttpEventFeed;

/// Failure to obtain a usable answer from the events feed.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// Connection failure or timeout.
    #[error("events feed unreachable: {0}")]
    Unreachable(String),

    /// The feed answered with a non-success status.
    #[error("events feed returned status {0}")]
    Status(u16),

    /// The feed body is not the expected document.
    #[error("events feed returned a malformed body: {0}")]
    Malformed(String),
}

/// Source of live event data.
#[async_trait]
pub trait EventOracle: Send + Sync + fmt::Debug {
    /// Fetches the raw feed document exactly as published.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] on transport failure, timeout, non-success
    /// status, or a body that is not JSON.
    async fn fetch_feed(&self) -> Result<serde_json::Value, OracleError>;

    /// Fetches the feed and looks up a single event by id.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if the feed cannot be fetched, does not
    /// match the `{events: [...]}` shape, or the requested entry is malformed.
    async fn find_event(&self, event_id: EventId) -> Result<Option<SportEvent>, OracleError> {
        locate_event(self.fetch_feed().await?, event_id)
    }
}

#[derive(Deserialize)]
struct RawFeed {
    events: Vec<serde_json::Value>,
}

/// Picks one event out of a raw feed document.
///
/// Only the matching entry is decoded, so a malformed neighbour does not
/// hide a valid event.
///
/// # Errors
///
/// Returns [`OracleError::Malformed`] if the document has no `events`
/// array or the matching entry is not a valid event.
pub fn locate_event(
    raw: serde_json::Value,
    event_id: EventId,
) -> Result<Option<SportEvent>, OracleError> {
    let feed: RawFeed =
        serde_json::from_value(raw).map_err(|e| OracleError::Malformed(e.to_string()))?;
    let Some(entry) = feed.events.into_iter().find(|entry| {
        entry
            .get("eventId")
            .and_then(|id| EventId::deserialize(id).ok())
            == Some(event_id)
    }) else {
        return Ok(None);
    };
    serde_json::from_value(entry)
        .map(Some)
        .map_err(|e| OracleError::Malformed(format!("event {event_id}: {e}")))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::EventStatus;

    fn feed() -> serde_json::Value {
        json!({"events": [
            {"eventId": 1006, "status": "canceled", "odds": null},
            {"eventId": "1001", "team1": "Spartak", "team2": "CSKA",
             "status": "upcoming", "odds": {"win1": 2.1, "draw": 3.2, "win2": 3.5}},
            "not an event",
        ]})
    }

    #[test]
    fn broken_neighbours_do_not_hide_a_valid_event() {
        let Ok(Some(event)) = locate_event(feed(), EventId::new(1001)) else {
            panic!("event 1001 should resolve");
        };
        assert_eq!(event.status, EventStatus::Upcoming);
        assert_eq!(event.team1, "Spartak");
    }

    #[test]
    fn malformed_target_entry_is_reported() {
        let result = locate_event(feed(), EventId::new(1006));
        assert!(matches!(result, Err(OracleError::Malformed(_))));
    }

    #[test]
    fn absent_event_is_none() {
        assert!(matches!(locate_event(feed(), EventId::new(42)), Ok(None)));
    }

    #[test]
    fn document_without_events_is_malformed() {
        let result = locate_event(json!({"items": []}), EventId::new(1001));
        assert!(matches!(result, Err(OracleError::Malformed(_))));
        let result = locate_event(json!({"events": {}}), EventId::new(1001));
        assert!(matches!(result, Err(OracleError::Malformed(_))));
    }
}
