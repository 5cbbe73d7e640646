//! Integration tests for the dashboard server.
//!
//! These tests start a real axum server on a random port and drive the form
//! and JSON endpoints with reqwest. Suggestion lookups go through a stub
//! transport so no network access is needed.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use serde_json::json;
use tripboard::api::gemini::GenerateContentRequest;
use tripboard::api::{SuggestionTransport, TransportResponse};
use tripboard::{Dashboard, GatewayError, RetryConfig, SuggestionGateway};
use tripboard_web::{WebConfig, spawn_web};

/// Answers every request with the same status and model text.
struct StubTransport {
    status: u16,
    text: String,
    calls: AtomicUsize,
}

#[async_trait]
impl SuggestionTransport for StubTransport {
    async fn send(
        &self,
        _request: &GenerateContentRequest,
    ) -> Result<TransportResponse, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let envelope = json!({"candidates": [{"content": {"parts": [{"text": self.text}]}}]});
        Ok(TransportResponse::new(self.status, envelope.to_string()))
    }
}

struct TestServer {
    dashboard: Arc<Dashboard>,
    transport: Arc<StubTransport>,
    base: String,
    client: reqwest::Client,
}

impl TestServer {
    async fn post_form(&self, path: &str, body: &str) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.base))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body.to_string())
            .send()
            .await
            .unwrap()
    }

    async fn suggestions(&self, query: &str) -> serde_json::Value {
        let resp = self
            .client
            .post(format!("{}/get_suggestions", self.base))
            .json(&json!({ "query": query }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }

    async fn state(&self) -> serde_json::Value {
        self.client
            .get(format!("{}/api/state", self.base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

/// Helper: spawn a test server on port 0 (random available port).
async fn spawn_test_server(status: u16, text: &str) -> TestServer {
    let dashboard = Arc::new(Dashboard::new());
    let transport = Arc::new(StubTransport {
        status,
        text: text.to_string(),
        calls: AtomicUsize::new(0),
    });
    let gateway = SuggestionGateway::new(transport.clone(), RetryConfig::with_attempts(1));

    let config = WebConfig {
        bind_addr: ([127, 0, 0, 1], 0).into(),
    };
    let addr = spawn_web(dashboard.clone(), gateway, config).await.unwrap();

    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap();
    TestServer {
        dashboard,
        transport,
        base: format!("http://{addr}"),
        client,
    }
}

fn assert_redirects_home(resp: &reqwest::Response) {
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers()[LOCATION], "/");
}

// ── Forms ────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_delete_task() {
    let server = spawn_test_server(200, "[]").await;

    let resp = server
        .post_form("/add_task", "task-input=Visit+museum&location-input=Louvre%2C+Paris")
        .await;
    assert_redirects_home(&resp);

    let tasks = server.dashboard.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].text, "Visit museum");
    assert_eq!(tasks[0].location, "Louvre, Paris");

    let resp = server
        .post_form(&format!("/delete_task/{}", tasks[0].id), "")
        .await;
    assert_redirects_home(&resp);
    assert!(server.dashboard.tasks().is_empty());
}

#[tokio::test]
async fn rejected_input_still_redirects() {
    let server = spawn_test_server(200, "[]").await;

    assert_redirects_home(&server.post_form("/add_task", "task-input=+++").await);
    assert_redirects_home(&server.post_form("/add_task", "").await);
    assert_redirects_home(
        &server
            .post_form(
                "/add_expense",
                "expense-description=Tea&expense-amount=-1&expense-category=Food",
            )
            .await,
    );
    assert_redirects_home(&server.post_form("/delete_task/999", "").await);
    assert_redirects_home(&server.post_form("/delete_expense/999", "").await);

    assert!(server.dashboard.tasks().is_empty());
    assert!(server.dashboard.expenses().is_empty());
}

#[tokio::test]
async fn budget_and_expenses_flow_into_state() {
    let server = spawn_test_server(200, "[]").await;

    assert_redirects_home(&server.post_form("/set_budget", "total-budget-input=1000").await);
    assert_redirects_home(
        &server
            .post_form(
                "/add_expense",
                "expense-description=Hotel&expense-amount=200.5&expense-category=",
            )
            .await,
    );
    assert_redirects_home(
        &server
            .post_form(
                "/add_expense",
                "expense-description=Dinner&expense-amount=50&expense-category=Food",
            )
            .await,
    );
    // Unparseable budget leaves the previous value.
    assert_redirects_home(&server.post_form("/set_budget", "total-budget-input=abc").await);

    let state = server.state().await;
    assert_eq!(state["total_budget"], "1000.00");
    assert_eq!(state["total_spent"], "250.50");
    assert_eq!(state["remaining"], "749.50");
    assert_eq!(state["over_budget"], false);
    assert_eq!(state["expenses"][0]["description"], "Dinner");
    assert_eq!(state["expenses"][1]["category"], "Other");

    let hotel_id = state["expenses"][1]["id"].as_str().unwrap().to_string();
    assert_redirects_home(
        &server
            .post_form(&format!("/delete_expense/{hotel_id}"), "")
            .await,
    );
    let state = server.state().await;
    assert_eq!(state["total_spent"], "50.00");
    assert_eq!(state["remaining"], "950.00");
}

#[tokio::test]
async fn index_renders_escaped_dashboard() {
    let server = spawn_test_server(200, "[]").await;
    server
        .post_form("/add_task", "task-input=%3Cb%3Ebold%3C%2Fb%3E&location-input=")
        .await;

    let resp = server.client.get(&server.base).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Trip &amp; Task Management Dashboard"));
    assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    assert!(html.contains("No location set"));
    assert!(html.contains("Set Initial Trip Budget"));
}

// ── Suggestions ──────────────────────────────────────────────────────

#[tokio::test]
async fn short_query_skips_lookup() {
    let server = spawn_test_server(200, r#"[{"name":"x"}]"#).await;

    assert_eq!(server.suggestions("ab").await, json!([]));
    assert_eq!(server.suggestions("  ab  ").await, json!([]));
    assert_eq!(server.transport.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn suggestions_pass_through_model_output() {
    let places = json!([
        {"name": "Eiffel Tower", "address": "Champ de Mars, Paris", "latitude": 48.8584, "longitude": 2.2945},
        {"name": "Eiffel Tower Restaurant", "address": "Las Vegas"}
    ]);
    let server = spawn_test_server(200, &places.to_string()).await;

    let result = server.suggestions("eiffel").await;
    assert_eq!(result, places);
    assert_eq!(server.transport.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn upstream_failure_yields_empty_array() {
    let server = spawn_test_server(403, "").await;
    assert_eq!(server.suggestions("eiffel tower").await, json!([]));

    let garbled = spawn_test_server(200, "Sorry, I can't help with that.").await;
    assert_eq!(garbled.suggestions("eiffel tower").await, json!([]));
}

#[tokio::test]
async fn missing_query_is_treated_as_empty() {
    let server = spawn_test_server(200, "[]").await;
    let resp = server
        .client
        .post(format!("{}/get_suggestions", server.base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!([]));
    assert_eq!(server.transport.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_suggestion_bodies_yield_empty_array() {
    let server = spawn_test_server(200, r#"[{"name":"x"}]"#).await;
    let url = format!("{}/get_suggestions", server.base);

    let requests = [
        server
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body("not json"),
        server.client.post(&url).body(r#"{"query":"eiffel tower"}"#),
        server.client.post(&url).json(&json!({"query": 42})),
        server.client.post(&url).json(&json!("eiffel tower")),
    ];
    for request in requests {
        let resp = request.send().await.unwrap();
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body, json!([]));
    }
    assert_eq!(server.transport.calls.load(Ordering::SeqCst), 0);
}
