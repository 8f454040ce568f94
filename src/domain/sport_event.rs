//! Sports events as reported by the upstream events feed.
//!
//! Events are never persisted by the gateway. They are fetched from the
//! feed on demand and only consulted to decide whether a new bet may be
//! accepted.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Numeric event identifier assigned by the feed.
///
/// Accepts either a JSON number or a numeric string on input; always
/// serialises as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct EventId(i64);

impl EventId {
    /// Wraps a raw feed id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw feed id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returned when a string is not a whole-number event id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid event id: {0}")]
pub struct InvalidEventId(pub String);

/// Converts a float to an id when it carries no fractional part.
fn whole_id(v: f64) -> Option<i64> {
    // i64::MAX is not representable as f64; the exclusive bound keeps the cast exact.
    let in_range = v >= i64::MIN as f64 && v < i64::MAX as f64;
    (v.is_finite() && v.fract() == 0.0 && in_range).then(|| v as i64)
}

impl FromStr for EventId {
    type Err = InvalidEventId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Ok(Self(id));
        }
        s.parse::<f64>()
            .ok()
            .and_then(whole_id)
            .map(Self)
            .ok_or_else(|| InvalidEventId(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EventIdVisitor;

        impl Visitor<'_> for EventIdVisitor {
            type Value = EventId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer event id or a numeric string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<EventId, E> {
                Ok(EventId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<EventId, E> {
                i64::try_from(v)
                    .map(EventId)
                    .map_err(|_| E::custom("event id out of range"))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<EventId, E> {
                whole_id(v)
                    .map(EventId)
                    .ok_or_else(|| E::custom(format!("event id must be a whole number: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<EventId, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(EventIdVisitor)
    }
}

/// Betting eligibility of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Not started yet; the only status that accepts new bets.
    Upcoming,
    /// In play.
    Live,
    /// Completed.
    Finished,
    /// Called off.
    Canceled,
    /// Any status string the gateway does not recognise.
    #[serde(other)]
    Unknown,
}

impl EventStatus {
    /// Returns `true` if new bets may be placed.
    #[must_use]
    pub const fn accepts_bets(self) -> bool {
        matches!(self, Self::Upcoming)
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Live => "live",
            Self::Finished => "finished",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current score of a live or finished event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Score {
    /// Goals of the first team.
    pub team1: u32,
    /// Goals of the second team.
    pub team2: u32,
}

/// Win/draw/win odds triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OddsTriple {
    /// First team wins.
    pub win1: f64,
    /// Draw.
    pub draw: f64,
    /// Second team wins.
    pub win2: f64,
}

/// One fixture from the events feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SportEvent {
    /// Feed id.
    pub event_id: EventId,
    /// Tournament round.
    #[serde(default)]
    pub round: Option<u32>,
    /// Tournament name.
    #[serde(default)]
    pub tournament: String,
    /// Local start date (`YYYY-MM-DD`).
    #[serde(default)]
    pub date: String,
    /// Local start time (`HH:MM:SS`), published as `mskTime`.
    #[serde(default, rename = "mskTime", alias = "time")]
    pub time: String,
    /// First team.
    pub team1: String,
    /// Second team.
    pub team2: String,
    /// Betting eligibility.
    pub status: EventStatus,
    /// Score, present once the event has started.
    #[serde(default)]
    pub score: Option<Score>,
    /// Quoted odds.
    pub odds: OddsTriple,
}

impl SportEvent {
    /// `"Team1 - Team2"` label.
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} - {}", self.team1, self.team2)
    }
}

/// Top-level document served by the events feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventFeed {
    /// All fixtures currently published.
    pub events: Vec<SportEvent>,
}

impl EventFeed {
    /// Linear scan for a fixture by id.
    #[must_use]
    pub fn find(&self, event_id: EventId) -> Option<&SportEvent> {
        self.events.iter().find(|e| e.event_id == event_id)
    }
}
