//! Route handlers.
//!
//! Form posts mutate the dashboard and always redirect back to `/`, whether
//! or not the input was accepted. The suggestion endpoint always answers with
//! a JSON array, empty when the lookup failed.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::{Form, Json};
use serde::Deserialize;
use tracing::debug;
use tripboard::{Dashboard, SuggestionGateway};

use crate::page;
use crate::snapshot::DashboardSnapshot;

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub gateway: SuggestionGateway,
}

fn back_to_dashboard() -> Redirect {
    Redirect::to("/")
}

/// GET /: Render the dashboard page.
pub async fn index(State(app): State<AppState>) -> Html<String> {
    let snapshot = DashboardSnapshot::capture(&app.dashboard);
    Html(page::render(&snapshot))
}

/// GET /api/state: Dashboard snapshot as JSON.
pub async fn get_state(State(app): State<AppState>) -> Json<DashboardSnapshot> {
    Json(DashboardSnapshot::capture(&app.dashboard))
}

/// Request body for POST /get_suggestions.
#[derive(Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub query: String,
}

/// POST /get_suggestions: Candidate locations for a free-text query.
///
/// A body that is not a JSON object with a string `query` is treated as an
/// empty query, so the answer is always a JSON array.
pub async fn post_suggestions(
    State(app): State<AppState>,
    body: Result<Json<SuggestionQuery>, JsonRejection>,
) -> Json<Vec<serde_json::Value>> {
    let query = match body {
        Ok(Json(body)) => body.query,
        Err(rejection) => {
            debug!("Unusable suggestion request: {rejection}");
            String::new()
        }
    };
    Json(app.gateway.suggest(&query).await)
}

/// Form body for POST /set_budget.
#[derive(Deserialize)]
pub struct BudgetForm {
    #[serde(rename = "total-budget-input", default)]
    pub total_budget: String,
}

/// POST /set_budget: Overwrite the trip budget.
pub async fn set_budget(State(app): State<AppState>, Form(form): Form<BudgetForm>) -> Redirect {
    let _ = app.dashboard.set_budget(&form.total_budget);
    back_to_dashboard()
}

/// Form body for POST /add_task.
#[derive(Deserialize)]
pub struct TaskForm {
    #[serde(rename = "task-input", default)]
    pub text: String,
    #[serde(rename = "location-input", default)]
    pub location: String,
}

/// POST /add_task: Add a task to the top of the list.
pub async fn add_task(State(app): State<AppState>, Form(form): Form<TaskForm>) -> Redirect {
    let _ = app.dashboard.add_task(&form.text, &form.location);
    back_to_dashboard()
}

/// POST /delete_task/{task_id}
pub async fn delete_task(State(app): State<AppState>, Path(task_id): Path<String>) -> Redirect {
    app.dashboard.delete_task(&task_id);
    back_to_dashboard()
}

/// Form body for POST /add_expense.
#[derive(Deserialize)]
pub struct ExpenseForm {
    #[serde(rename = "expense-description", default)]
    pub description: String,
    #[serde(rename = "expense-amount", default)]
    pub amount: String,
    #[serde(rename = "expense-category", default)]
    pub category: String,
}

/// POST /add_expense: Record an expense.
pub async fn add_expense(State(app): State<AppState>, Form(form): Form<ExpenseForm>) -> Redirect {
    let _ = app
        .dashboard
        .add_expense(&form.description, &form.amount, &form.category);
    back_to_dashboard()
}

/// POST /delete_expense/{expense_id}
pub async fn delete_expense(
    State(app): State<AppState>,
    Path(expense_id): Path<String>,
) -> Redirect {
    app.dashboard.delete_expense(&expense_id);
    back_to_dashboard()
}
