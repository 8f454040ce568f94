//! # wager-gateway
//!
//! REST gateway for a virtual-currency sports betting platform.
//!
//! Users sign in through an external identity provider, receive a wallet
//! of play money, and stake it on fixtures published by an external
//! events feed. Settlement of bets happens outside this service; the
//! gateway only records pending bets and exposes the primitive to close
//! them.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── WalletLedger / BetBook / BetPlacement / Leaderboard (service/)
//!     │
//!     ├── IdentityProvider (identity/)   ── PocketBase
//!     ├── EventOracle (oracle/)          ── events feed
//!     │
//!     └── WagerStore (persistence/)      ── PostgreSQL | memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod demo_feed;
pub mod domain;
pub mod error;
pub mod identity;
pub mod oracle;
pub mod persistence;
pub mod service;
