//! Serializable view of the [`Dashboard`] for rendering and `/api/state`.
//!
//! The dashboard keeps each store behind its own lock. [`DashboardSnapshot`]
//! copies everything a page render needs in one pass, so the renderer never
//! touches a lock.

use serde::Serialize;
use tripboard::{Dashboard, Expense, Money, Task};

/// Point-in-time copy of the dashboard state.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    // ── To-do ──
    pub tasks: Vec<Task>,

    // ── Budget ──
    pub expenses: Vec<Expense>,
    pub total_budget: Money,
    pub total_spent: Money,
    pub remaining: Money,
    pub over_budget: bool,
}

impl DashboardSnapshot {
    pub fn capture(dashboard: &Dashboard) -> Self {
        let summary = dashboard.budget_summary();
        Self {
            tasks: dashboard.tasks(),
            expenses: dashboard.expenses(),
            total_budget: summary.total_budget,
            total_spent: summary.total_spent,
            remaining: summary.remaining,
            over_budget: summary.over_budget(),
        }
    }

    /// Whether the initial one-time budget form should be shown.
    pub fn budget_unset(&self) -> bool {
        self.total_budget == Money::ZERO
    }
}
