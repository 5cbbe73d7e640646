//! Two-decimal currency values.
//!
//! Every amount in the dashboard (expense amounts, the trip budget, the
//! derived totals) is a [`Money`]: a [`Decimal`] whose scale is pinned to two
//! digits. Rounding happens once, when an amount is stored, using round-half-up
//! (midpoint away from zero), so `2.675` becomes `2.68` regardless of how a
//! binary float would have represented it.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of fractional digits kept for every amount.
pub const CENTS_SCALE: u32 = 2;

/// A currency amount with exactly two fractional digits.
///
/// Serializes as a string (`"3.50"`) so JSON consumers never see float
/// artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    /// `0.00`
    pub const ZERO: Money = Money(Decimal::from_parts(0, 0, 0, false, CENTS_SCALE));

    /// Round an arbitrary decimal to cents.
    ///
    /// `None` when the value is too large to carry two fractional digits in
    /// 96 bits; `rescale` would otherwise drop digits silently.
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        let mut rounded =
            value.round_dp_with_strategy(CENTS_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(CENTS_SCALE);
        if rounded.scale() != CENTS_SCALE {
            return None;
        }
        if rounded.is_zero() {
            // "-0" and "-0.001" would otherwise render as "-0.00".
            rounded.set_sign_positive(true);
        }
        Some(Money(rounded))
    }

    /// Parse user input as an exact, unrounded decimal.
    ///
    /// Surrounding whitespace is ignored. Accepts plain (`"3.5"`, `"-1"`) and
    /// scientific (`"1e2"`) notation. Returns `None` for anything else,
    /// including empty input, `nan` and `inf`. Sign checks belong on this
    /// value, before [`Money::from_decimal`] rounds `-0.004` to `0.00`.
    pub fn parse_decimal(raw: &str) -> Option<Decimal> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .ok()
    }

    /// Parse and round to cents. The sign is preserved.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::parse_decimal(raw).and_then(Self::from_decimal)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// `self - other`, or `None` if the result leaves the two-decimal range.
    pub fn checked_minus(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).and_then(Money::from_decimal)
    }

    /// `self + other`, or `None` if the result leaves the two-decimal range.
    pub fn checked_plus(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).and_then(Money::from_decimal)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Money::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {raw:?}")))
    }
}
