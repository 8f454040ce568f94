//! Data Transfer Objects for REST request/response serialization.
//!
//! All JSON field names are camelCase. Money is serialized as a decimal
//! string with two fractional digits.

pub mod auth_dto;
pub mod bet_dto;
pub mod leaderboard_dto;
pub mod wallet_dto;

pub use auth_dto::*;
pub use bet_dto::*;
pub use leaderboard_dto::*;
pub use wallet_dto::*;
