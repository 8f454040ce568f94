//! Demo events feed served by the `events-mock` binary.
//!
//! Fixture start times are relative to the moment of the request, so the
//! feed always offers a mix of upcoming, live, finished and canceled
//! events.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::domain::{EventFeed, EventId, EventStatus, OddsTriple, Score, SportEvent};

/// Offset of Moscow time, used for the published date and time.
const MSK_OFFSET_SECS: i32 = 3 * 3600;

struct Fixture {
    id: i64,
    minutes_ahead: i64,
    round: u32,
    team1: &'static str,
    team2: &'static str,
    odds: (f64, f64, f64),
}

const TOURNAMENT: &str = "RPL";

const FIXTURES: [Fixture; 5] = [
    Fixture {
        id: 1001,
        minutes_ahead: 30,
        round: 18,
        team1: "Spartak",
        team2: "CSKA",
        odds: (1.85, 3.5, 4.1),
    },
    Fixture {
        id: 1002,
        minutes_ahead: 90,
        round: 18,
        team1: "Zenit",
        team2: "Dynamo",
        odds: (2.1, 3.3, 3.3),
    },
    Fixture {
        id: 1003,
        minutes_ahead: 150,
        round: 18,
        team1: "Lokomotiv",
        team2: "Krasnodar",
        odds: (2.4, 3.2, 2.9),
    },
    Fixture {
        id: 1004,
        minutes_ahead: -120,
        round: 17,
        team1: "Rostov",
        team2: "Ural",
        odds: (1.9, 3.4, 4.0),
    },
    Fixture {
        id: 1005,
        minutes_ahead: -240,
        round: 17,
        team1: "Orenburg",
        team2: "Akhmat",
        odds: (2.2, 3.1, 3.2),
    },
];

/// Status of an event starting at `start`, seen at `now`.
///
/// More than an hour ahead is upcoming; anything that started less than
/// ninety minutes ago is live; the rest is finished.
#[must_use]
pub fn status_at(start: DateTime<Utc>, now: DateTime<Utc>) -> EventStatus {
    let ahead = start - now;
    if ahead > Duration::hours(1) {
        EventStatus::Upcoming
    } else if ahead > -Duration::minutes(90) {
        EventStatus::Live
    } else {
        EventStatus::Finished
    }
}

/// Source of random goal counts.
#[derive(Debug, Default)]
pub struct ScoreDice {
    state: RandomState,
    rolls: u64,
}

impl ScoreDice {
    /// Goal count in `0..=3`.
    pub fn roll(&mut self) -> u32 {
        self.rolls = self.rolls.wrapping_add(1);
        let mut hasher = self.state.build_hasher();
        hasher.write_u64(self.rolls);
        u32::try_from(hasher.finish() % 4).unwrap_or(0)
    }
}

fn msk_parts(at: DateTime<Utc>) -> (String, String) {
    match FixedOffset::east_opt(MSK_OFFSET_SECS) {
        Some(offset) => {
            let local = at.with_timezone(&offset);
            (
                local.format("%Y-%m-%d").to_string(),
                local.format("%H:%M:%S").to_string(),
            )
        }
        None => (
            at.format("%Y-%m-%d").to_string(),
            at.format("%H:%M:%S").to_string(),
        ),
    }
}

/// Builds the feed as seen at `now`.
pub fn feed_at(now: DateTime<Utc>, dice: &mut ScoreDice) -> EventFeed {
    let mut events: Vec<SportEvent> = FIXTURES
        .iter()
        .map(|fixture| {
            let start = now + Duration::minutes(fixture.minutes_ahead);
            let (date, time) = msk_parts(start);
            let status = status_at(start, now);
            let started = matches!(status, EventStatus::Live | EventStatus::Finished);
            let score = started.then(|| Score {
                team1: dice.roll(),
                team2: dice.roll(),
            });
            SportEvent {
                event_id: EventId::new(fixture.id),
                round: Some(fixture.round),
                tournament: TOURNAMENT.to_string(),
                date,
                time,
                team1: fixture.team1.to_string(),
                team2: fixture.team2.to_string(),
                status,
                score,
                odds: OddsTriple {
                    win1: fixture.odds.0,
                    draw: fixture.odds.1,
                    win2: fixture.odds.2,
                },
            }
        })
        .collect();

    events.push(SportEvent {
        event_id: EventId::new(1006),
        round: Some(18),
        tournament: TOURNAMENT.to_string(),
        date: "2024-03-15".to_string(),
        time: "19:00:00".to_string(),
        team1: "Krylia Sovetov".to_string(),
        team2: "Fakel".to_string(),
        status: EventStatus::Canceled,
        score: None,
        odds: OddsTriple {
            win1: 2.0,
            draw: 3.2,
            win2: 3.8,
        },
    });

    EventFeed { events }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        let Some(at) = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).single() else {
            panic!("valid instant");
        };
        at
    }

    #[test]
    fn status_boundaries() {
        let now = noon();
        assert_eq!(status_at(now + Duration::minutes(61), now), EventStatus::Upcoming);
        assert_eq!(status_at(now + Duration::minutes(60), now), EventStatus::Live);
        assert_eq!(status_at(now - Duration::minutes(89), now), EventStatus::Live);
        assert_eq!(status_at(now - Duration::minutes(90), now), EventStatus::Finished);
    }

    #[test]
    fn feed_mixes_statuses() {
        let feed = feed_at(noon(), &mut ScoreDice::default());
        let statuses: Vec<EventStatus> = feed.events.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                EventStatus::Live,
                EventStatus::Upcoming,
                EventStatus::Upcoming,
                EventStatus::Finished,
                EventStatus::Finished,
                EventStatus::Canceled,
            ]
        );
        for event in &feed.events {
            let started = matches!(event.status, EventStatus::Live | EventStatus::Finished);
            assert_eq!(event.score.is_some(), started, "event {}", event.event_id);
            if let Some(score) = event.score {
                assert!(score.team1 <= 3 && score.team2 <= 3);
            }
        }
    }

    #[test]
    fn times_are_published_in_moscow_time() {
        let feed = feed_at(noon(), &mut ScoreDice::default());
        let Some(first) = feed.find(EventId::new(1001)) else {
            panic!("fixture 1001 missing");
        };
        assert_eq!(first.date, "2026-10-16");
        assert_eq!(first.time, "15:30:00");

        let json = serde_json::to_value(first).unwrap_or_default();
        assert_eq!(
            json.get("mskTime").and_then(|v| v.as_str()),
            Some("15:30:00")
        );
    }
}
