//! Fixed-point currency helpers.
//!
//! Every monetary value in the gateway is a [`Decimal`] carried at exactly
//! two fractional digits, matching the `NUMERIC(12,2)` columns in the
//! database. [`to_cents`] is the single place where that scale is enforced.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Number of fractional digits kept for balances, stakes and payouts.
pub const MONEY_SCALE: u32 = 2;

/// Largest value that fits a `NUMERIC(12,2)` column.
pub const MAX_AMOUNT: Decimal = dec!(9999999999.99);

/// Largest value that fits the `NUMERIC(6,2)` odds column.
pub const MAX_ODDS: Decimal = dec!(9999.99);

/// Rounds `value` half away from zero and pads it to exactly two
/// fractional digits, so `1000` renders as `"1000.00"`.
#[must_use]
pub fn to_cents(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Potential payout of a stake at decimal odds, at two fractional digits.
///
/// Returns `None` if the product overflows [`Decimal`].
#[must_use]
pub fn payout(stake: Decimal, odds: Decimal) -> Option<Decimal> {
    stake.checked_mul(odds).map(to_cents)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn to_cents_pads_whole_numbers() {
        assert_eq!(to_cents(dec!(1000)).to_string(), "1000.00");
        assert_eq!(to_cents(dec!(2.5)).to_string(), "2.50");
    }

    #[test]
    fn to_cents_rounds_half_away_from_zero() {
        assert_eq!(to_cents(dec!(1.005)).to_string(), "1.01");
        assert_eq!(to_cents(dec!(1.004)).to_string(), "1.00");
        assert_eq!(to_cents(dec!(2.675)).to_string(), "2.68");
    }

    #[test]
    fn payout_multiplies_and_rounds() {
        let cases = [
            (dec!(100), dec!(2.50), "250.00"),
            (dec!(3), dec!(1.85), "5.55"),
            (dec!(7), dec!(1.33), "9.31"),
        ];
        for (stake, odds, expected) in cases {
            let Some(win) = payout(stake, odds) else {
                panic!("payout overflowed for {stake} x {odds}");
            };
            assert_eq!(win.to_string(), expected);
        }
    }

    #[test]
    fn payout_overflow_is_none() {
        assert!(payout(Decimal::MAX, dec!(2)).is_none());
    }
}
