//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::identity::IdentityProvider;
use crate::oracle::EventOracle;
use crate::persistence::WagerStore;
use crate::service::{BetBook, BetPlacement, Leaderboard, WalletLedger};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Built once at startup from a store, an events feed and an identity
/// provider; handlers receive everything they need from here.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Wallet balances.
    pub ledger: Arc<WalletLedger>,
    /// Bet history and settlement primitives.
    pub bets: Arc<BetBook>,
    /// Bet placement transaction.
    pub placement: Arc<BetPlacement>,
    /// Ranked view of users.
    pub leaderboard: Arc<Leaderboard>,
    /// Upstream events feed.
    pub oracle: Arc<dyn EventOracle>,
    /// Upstream identity provider.
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Wires the service layer over the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn WagerStore>,
        oracle: Arc<dyn EventOracle>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let ledger = Arc::new(WalletLedger::new(Arc::clone(&store)));
        let placement = Arc::new(BetPlacement::new(
            Arc::clone(&store),
            Arc::clone(&ledger),
            Arc::clone(&oracle),
        ));
        Self {
            bets: Arc::new(BetBook::new(Arc::clone(&store))),
            leaderboard: Arc::new(Leaderboard::new(store)),
            ledger,
            placement,
            oracle,
            identity,
        }
    }
}
