//! Domain layer: wallets, bets, feed events and money arithmetic.
//!
//! These types carry no I/O. Storage lives in [`crate::persistence`],
//! upstream feeds in [`crate::oracle`] and [`crate::identity`].

pub mod bet;
pub mod money;
pub mod sport_event;
pub mod user_id;
pub mod wager;
pub mod wallet;

pub use bet::{Bet, BetStatus, NewBet};
pub use sport_event::{
    EventFeed, EventId, EventStatus, InvalidEventId, OddsTriple, Score, SportEvent,
};
pub use user_id::UserId;
pub use wager::{SlipText, Wager, WagerSlip};
pub use wallet::Wallet;
