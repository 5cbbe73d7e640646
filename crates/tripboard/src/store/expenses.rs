//! Expense store.

use serde::Serialize;
use tracing::error;

use super::{IdCounter, Rejection, parse_amount};
use crate::money::Money;

/// Category assigned when the submitted one is blank.
pub const DEFAULT_CATEGORY: &str = "Other";

/// A recorded spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
    pub id: String,
    pub description: String,
    /// Never negative. Zero is allowed for free items.
    pub amount: Money,
    pub category: String,
}

/// Ordered expense collection, most recent first.
#[derive(Debug, Default)]
pub struct ExpenseStore {
    expenses: Vec<Expense>,
    ids: IdCounter,
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an expense at the front of the list.
    ///
    /// `amount_raw` must parse as a non-negative number; it is stored rounded
    /// half-up to cents. A blank `category` becomes [`DEFAULT_CATEGORY`].
    /// An amount that would push [`total_spent`](Self::total_spent) out of
    /// range is rejected, so the total is always exact.
    pub fn add(
        &mut self,
        description: &str,
        amount_raw: &str,
        category: &str,
    ) -> Result<Expense, Rejection> {
        let amount = parse_amount(amount_raw)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(Rejection::EmptyDescription);
        }
        if self.checked_total()?.checked_plus(amount).is_none() {
            return Err(Rejection::TotalOverflow);
        }
        let category = match category.trim() {
            "" => DEFAULT_CATEGORY,
            c => c,
        };

        let expense = Expense {
            id: self.ids.issue(),
            description: description.to_string(),
            amount,
            category: category.to_string(),
        };
        self.expenses.insert(0, expense.clone());
        Ok(expense)
    }

    /// Remove the expense with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        self.expenses.len() != before
    }

    pub fn list(&self) -> &[Expense] {
        &self.expenses
    }

    /// Sum of all stored amounts. Recomputed on every call.
    pub fn total_spent(&self) -> Money {
        self.checked_total().unwrap_or_else(|_| {
            // add() refuses amounts that would overflow, so this is unreachable.
            error!("expense total out of range");
            Money::ZERO
        })
    }

    fn checked_total(&self) -> Result<Money, Rejection> {
        self.expenses
            .iter()
            .try_fold(Money::ZERO, |acc, e| acc.checked_plus(e.amount))
            .ok_or(Rejection::TotalOverflow)
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}
