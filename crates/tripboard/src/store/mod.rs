//! In-memory record stores.
//!
//! - [`tasks`]: [`TaskStore`], the to-do list.
//! - [`expenses`]: [`ExpenseStore`], recorded spends and their running total.
//! - [`budget`]: [`BudgetLedger`], the single trip budget and the derived
//!   remaining amount.
//!
//! Stores are plain single-owner values with `&mut self` mutations. Sharing
//! across request handlers goes through [`Dashboard`](crate::Dashboard), which
//! puts each store behind its own lock.
//!
//! Invalid input never produces a record. Mutations return
//! `Result<_, Rejection>` so callers can tell "created" from "ignored" even
//! though the web layer surfaces neither.

pub mod budget;
pub mod expenses;
pub mod tasks;

pub use budget::BudgetLedger;
pub use expenses::{DEFAULT_CATEGORY, Expense, ExpenseStore};
pub use tasks::{Task, TaskStore};

use thiserror::Error;

use crate::money::Money;

/// Why a store mutation was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("task text is empty")]
    EmptyText,
    #[error("expense description is empty")]
    EmptyDescription,
    #[error("amount is not a number: {0:?}")]
    InvalidAmount(String),
    #[error("amount is negative: {0}")]
    NegativeAmount(String),
    #[error("amount is too large: {0}")]
    AmountTooLarge(String),
    #[error("total spent would exceed the representable range")]
    TotalOverflow,
}

/// Parse a non-negative amount and round it to cents.
///
/// The sign is checked on the exact input, so `-0.004` is rejected rather
/// than rounded to `0.00`. `-0` itself is zero and accepted.
pub(crate) fn parse_amount(raw: &str) -> Result<Money, Rejection> {
    let trimmed = raw.trim();
    let Some(value) = Money::parse_decimal(trimmed) else {
        return Err(Rejection::InvalidAmount(trimmed.to_string()));
    };
    if value.is_sign_negative() && !value.is_zero() {
        return Err(Rejection::NegativeAmount(trimmed.to_string()));
    }
    Money::from_decimal(value).ok_or_else(|| Rejection::AmountTooLarge(trimmed.to_string()))
}

/// Issues ids for one collection. Never hands out the same value twice.
#[derive(Debug, Clone)]
pub(crate) struct IdCounter {
    next: u64,
}

impl Default for IdCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdCounter {
    pub(crate) fn issue(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }
}
