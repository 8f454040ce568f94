//! Structural and policy validation of an incoming wager.
//!
//! [`WagerSlip`] is the raw request, mostly as strings. [`WagerSlip::validate`]
//! turns it into a [`Wager`] or rejects it. Nothing here performs I/O, so
//! a rejected slip can never leave partial state behind.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::money::{MAX_AMOUNT, MAX_ODDS, payout, to_cents};
use super::{EventId, NewBet, UserId};
use crate::error::{ApiError, FieldErrors};

/// Smallest accepted stake, in whole coins.
pub const MIN_STAKE: Decimal = Decimal::ONE;

/// A free-text slip field as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlipText {
    /// A JSON string.
    Text(String),
    /// A value of another JSON type, rendered as JSON.
    NotText(String),
}

impl From<String> for SlipText {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for SlipText {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// A wager exactly as submitted by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WagerSlip {
    /// Event id, as text.
    pub event_id: Option<String>,
    /// Event display name.
    pub event_name: Option<SlipText>,
    /// Selection label.
    pub selection: Option<SlipText>,
    /// Quoted decimal odds, as text.
    pub odds: Option<String>,
    /// Stake, as text.
    pub amount: Option<String>,
}

/// A wager that passed structural and policy validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wager {
    /// Targeted event.
    pub event_id: EventId,
    /// Event display name (trimmed).
    pub event_name: String,
    /// Selection label (trimmed).
    pub selection: String,
    /// Odds at two fractional digits.
    pub odds: Decimal,
    /// Whole-coin stake at two fractional digits.
    pub stake: Decimal,
    /// `stake × odds` at two fractional digits.
    pub potential_win: Decimal,
}

impl Wager {
    /// Binds the wager to its owner.
    #[must_use]
    pub fn into_new_bet(self, user_id: UserId) -> NewBet {
        NewBet {
            user_id,
            event_id: self.event_id,
            event_name: self.event_name,
            selection: self.selection,
            odds: self.odds,
            amount: self.stake,
            potential_win: self.potential_win,
        }
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

fn required_text(errors: &mut FieldErrors, field: &str, value: Option<&SlipText>) -> String {
    match value {
        Some(SlipText::Text(v)) if !v.trim().is_empty() => v.trim().to_string(),
        Some(SlipText::Text(_)) => {
            push(errors, field, "must not be empty");
            String::new()
        }
        Some(SlipText::NotText(_)) => {
            push(errors, field, "must be a string");
            String::new()
        }
        None => {
            push(errors, field, "is required");
            String::new()
        }
    }
}

fn positive_decimal(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&String>,
    max: Decimal,
) -> Decimal {
    let Some(raw) = value else {
        push(errors, field, "is required");
        return Decimal::ZERO;
    };
    let Ok(parsed) = Decimal::from_str(raw.trim()) else {
        push(errors, field, "must be a positive number");
        return Decimal::ZERO;
    };
    let normalized = to_cents(parsed);
    if normalized <= Decimal::ZERO {
        push(errors, field, "must be a positive number");
    } else if normalized > max {
        push(errors, field, &format!("must not exceed {max}"));
    }
    parsed
}

impl WagerSlip {
    /// Validates the slip.
    ///
    /// Structural problems are collected per field and reported together.
    /// Stake policy (at least one coin, whole coins only) is checked only
    /// once the slip is structurally sound.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for malformed fields and
    /// [`ApiError::StakePolicy`] for a stake that breaks the staking rules.
    pub fn validate(&self) -> Result<Wager, ApiError> {
        let mut errors = FieldErrors::new();

        let event_id = match self.event_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => match raw.parse::<EventId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    push(&mut errors, "eventId", "must be an integer");
                    None
                }
            },
            _ => {
                push(&mut errors, "eventId", "is required");
                None
            }
        };
        let event_name = required_text(&mut errors, "eventName", self.event_name.as_ref());
        let selection = required_text(&mut errors, "selection", self.selection.as_ref());
        let odds = positive_decimal(&mut errors, "odds", self.odds.as_ref(), MAX_ODDS);
        let stake = positive_decimal(&mut errors, "amount", self.amount.as_ref(), MAX_AMOUNT);

        let Some(event_id) = event_id.filter(|_| errors.is_empty()) else {
            return Err(ApiError::validation("invalid bet data", errors));
        };

        if stake < MIN_STAKE {
            return Err(ApiError::StakePolicy(format!(
                "stake must be at least {MIN_STAKE}"
            )));
        }
        if !stake.fract().is_zero() {
            return Err(ApiError::StakePolicy(
                "stake must be a whole number of coins".to_string(),
            ));
        }

        let odds = to_cents(odds);
        let stake = to_cents(stake);
        let potential_win = payout(stake, odds)
            .filter(|win| *win <= MAX_AMOUNT)
            .ok_or_else(|| {
                ApiError::StakePolicy("potential win exceeds the maximum payout".to_string())
            })?;

        Ok(Wager {
            event_id,
            event_name,
            selection,
            odds,
            stake,
            potential_win,
        })
    }
}
