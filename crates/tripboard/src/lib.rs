//! In-memory state and location lookups for a trip dashboard.
//!
//! `tripboard` is the engine behind `tripboard-web`: a to-do list whose tasks
//! can carry a location, an expense log, a trip budget, and a gateway that
//! turns free-text place queries into candidate locations via a
//! search-grounded generative model.
//!
//! Everything lives in process memory. Nothing survives a restart, and ids are
//! only unique for the lifetime of one process.
//!
//! # Getting started
//!
//! ```
//! use tripboard::Dashboard;
//!
//! let dash = Dashboard::new();
//! dash.set_budget("1000").unwrap();
//! dash.add_expense("Train tickets", "250.5", "Transport").unwrap();
//! dash.add_task("Book the museum", "").unwrap();
//!
//! let summary = dash.budget_summary();
//! assert_eq!(summary.remaining.to_string(), "749.50");
//! assert_eq!(dash.tasks()[0].text, "Book the museum");
//! ```
//!
//! Location lookups:
//!
//! ```ignore
//! use tripboard::{GatewayConfig, SuggestionGateway};
//!
//! let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
//! let gateway = SuggestionGateway::from_config(&GatewayConfig::new(api_key))?;
//! for place in gateway.suggest("italian restaurant near the river").await {
//!     println!("{}", place["name"]);
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`store`] | [`TaskStore`], [`ExpenseStore`], [`BudgetLedger`] and the [`Rejection`] type |
//! | [`dashboard`] | [`Dashboard`]: the shared, lock-per-store aggregate |
//! | [`money`] | [`Money`]: two-decimal amounts, rounded half-up |
//! | [`api`] | [`SuggestionGateway`], retry state machine, transport, Gemini wire types |
//! | [`error`] | [`GatewayError`] |

pub mod api;
pub mod dashboard;
pub mod error;
pub mod money;
pub mod store;

pub use api::{GatewayConfig, LocationSuggestion, RetryConfig, SuggestionGateway};
pub use dashboard::{BudgetSummary, Dashboard};
pub use error::GatewayError;
pub use money::Money;
pub use store::{BudgetLedger, Expense, ExpenseStore, Rejection, Task, TaskStore};

/// Environment variable holding the suggestion API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
