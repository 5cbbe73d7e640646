//! Trip budget ledger.

use super::{Rejection, parse_amount};
use crate::money::Money;

/// Holds the total trip budget. Starts at `0.00`.
#[derive(Debug, Default, Clone)]
pub struct BudgetLedger {
    total: Money,
}

impl BudgetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the budget with `raw` rounded to cents.
    ///
    /// Unparseable, negative or out-of-range input leaves the ledger
    /// untouched.
    pub fn set(&mut self, raw: &str) -> Result<Money, Rejection> {
        let value = parse_amount(raw)?;
        self.total = value;
        Ok(value)
    }

    pub fn current(&self) -> Money {
        self.total
    }

    /// Budget left after `total_spent`. Negative when over budget.
    ///
    /// Both operands are non-negative two-decimal values, so the difference
    /// always fits; `None` only if `total_spent` is itself negative.
    pub fn remaining(&self, total_spent: Money) -> Option<Money> {
        self.total.checked_minus(total_spent)
    }
}
