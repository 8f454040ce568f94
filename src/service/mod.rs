//! Service layer: business logic orchestration.
//!
//! Every service holds an `Arc<dyn WagerStore>` (and, for placement, the
//! event oracle) injected at startup; none keeps per-request state.

pub mod bet_book;
pub mod leaderboard;
pub mod ledger;
pub mod placement;

pub use bet_book::BetBook;
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use ledger::WalletLedger;
pub use placement::BetPlacement;
