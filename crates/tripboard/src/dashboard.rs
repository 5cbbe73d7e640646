//! Process-wide dashboard state.
//!
//! [`Dashboard`] owns one [`TaskStore`], one [`ExpenseStore`] and one
//! [`BudgetLedger`], each behind its own mutex. It is built once at startup
//! and shared with request handlers as `Arc<Dashboard>`. Every read-modify-write
//! (id issue + insert, filter-and-replace delete, budget overwrite) runs under
//! the owning store's lock, so concurrent requests never lose updates or see
//! duplicate ids.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, error};

use crate::money::Money;
use crate::store::{BudgetLedger, Expense, ExpenseStore, Rejection, Task, TaskStore};

/// Budget figures derived from the ledger and the expense store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetSummary {
    pub total_budget: Money,
    pub total_spent: Money,
    /// `total_budget - total_spent`; negative when over budget.
    pub remaining: Money,
}

impl BudgetSummary {
    pub fn over_budget(&self) -> bool {
        self.remaining.is_negative()
    }
}

/// Shared handle over all dashboard stores.
#[derive(Debug, Default)]
pub struct Dashboard {
    tasks: Mutex<TaskStore>,
    expenses: Mutex<ExpenseStore>,
    budget: Mutex<BudgetLedger>,
}

/// Lock a store, recovering the guard if a previous holder panicked.
///
/// Store mutations are single `Vec` operations, so a poisoned lock still
/// guards consistent data.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Tasks ──

    pub fn add_task(&self, text: &str, location: &str) -> Result<Task, Rejection> {
        let result = lock(&self.tasks).add(text, location);
        match &result {
            Ok(task) => debug!(id = %task.id, "task added"),
            Err(e) => debug!("add_task ignored: {e}"),
        }
        result
    }

    pub fn delete_task(&self, id: &str) -> bool {
        let removed = lock(&self.tasks).delete(id);
        debug!(id, removed, "delete_task");
        removed
    }

    /// Copy of the task list, most recent first.
    pub fn tasks(&self) -> Vec<Task> {
        lock(&self.tasks).list().to_vec()
    }

    // ── Expenses ──

    pub fn add_expense(
        &self,
        description: &str,
        amount_raw: &str,
        category: &str,
    ) -> Result<Expense, Rejection> {
        let result = lock(&self.expenses).add(description, amount_raw, category);
        match &result {
            Ok(expense) => debug!(id = %expense.id, amount = %expense.amount, "expense added"),
            Err(e) => debug!("add_expense ignored: {e}"),
        }
        result
    }

    pub fn delete_expense(&self, id: &str) -> bool {
        let removed = lock(&self.expenses).delete(id);
        debug!(id, removed, "delete_expense");
        removed
    }

    /// Copy of the expense list, most recent first.
    pub fn expenses(&self) -> Vec<Expense> {
        lock(&self.expenses).list().to_vec()
    }

    pub fn total_spent(&self) -> Money {
        lock(&self.expenses).total_spent()
    }

    // ── Budget ──

    pub fn set_budget(&self, raw: &str) -> Result<Money, Rejection> {
        let result = lock(&self.budget).set(raw);
        match &result {
            Ok(value) => debug!(budget = %value, "budget set"),
            Err(e) => debug!("set_budget ignored: {e}"),
        }
        result
    }

    pub fn budget(&self) -> Money {
        lock(&self.budget).current()
    }

    /// Current budget, fresh total spent, and what is left.
    pub fn budget_summary(&self) -> BudgetSummary {
        let total_spent = self.total_spent();
        let ledger = lock(&self.budget);
        let remaining = ledger.remaining(total_spent).unwrap_or_else(|| {
            // Budget and total spent are both non-negative two-decimal values.
            error!(%total_spent, "remaining budget out of range");
            Money::ZERO
        });
        BudgetSummary {
            total_budget: ledger.current(),
            total_spent,
            remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn summary_reflects_budget_and_expenses() {
        let dash = Dashboard::new();
        dash.set_budget("1000").unwrap();
        dash.add_expense("Hotel", "200.50", "Other").unwrap();
        dash.add_expense("Food", "50", "Food").unwrap();

        let summary = dash.budget_summary();
        assert_eq!(summary.total_budget.to_string(), "1000.00");
        assert_eq!(summary.total_spent.to_string(), "250.50");
        assert_eq!(summary.remaining.to_string(), "749.50");
        assert!(!summary.over_budget());
    }

    #[test]
    fn summary_goes_negative_when_over_budget() {
        let dash = Dashboard::new();
        dash.set_budget("100.00").unwrap();
        dash.add_expense("Concert", "150.00", "Other").unwrap();

        let summary = dash.budget_summary();
        assert_eq!(summary.remaining.to_string(), "-50.00");
        assert!(summary.over_budget());
    }

    #[test]
    fn rejected_commands_change_nothing() {
        let dash = Dashboard::new();
        dash.set_budget("2500").unwrap();

        assert!(dash.set_budget("abc").is_err());
        assert!(dash.add_task("  ", "Somewhere").is_err());
        assert!(dash.add_expense("Tea", "-1", "Food").is_err());
        assert!(!dash.delete_task("7"));

        assert_eq!(dash.budget().to_string(), "2500.00");
        assert!(dash.tasks().is_empty());
        assert!(dash.expenses().is_empty());
    }

    #[test]
    fn concurrent_adds_get_unique_ids() {
        let dash = Arc::new(Dashboard::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let dash = dash.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        dash.add_task(&format!("task {worker}-{i}"), "").unwrap();
                        dash.add_expense("item", "1", "").unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let tasks = dash.tasks();
        assert_eq!(tasks.len(), 400);
        let ids: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 400);
        assert_eq!(dash.total_spent().to_string(), "400.00");
    }
}
