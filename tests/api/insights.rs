use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use reqwest::StatusCode;

use serde_json::json;

use wiremock::matchers::*;

use finsight::client::LlmError;
use finsight::insights::{GenerationRequest, LanguageModel};

use crate::helpers::{body_json, TestApp};

const TABLE: &str = "users_insights";

/// Answers structured requests by schema and everything else with markdown
#[derive(Default)]
struct CannedModel {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

#[async_trait]
impl LanguageModel for CannedModel {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LlmError::EmptyResponse);
        }

        let answer = match &request.response_schema {
            None => "## Notes\n- keep going".to_string(),
            Some(schema) if schema["properties"].get("priority").is_some() => json!({
                "user_id": 1,
                "priority": ["debt", "savings"],
                "justification": ["High interest card", "No emergency fund"],
            })
            .to_string(),
            Some(_) => json!({
                "financial_goal": "Become debt free",
                "detailed_insight": "Pay the card first.",
                "implications": "- Less interest",
                "recommended_actions": "- Pay 200 a month",
            })
            .to_string(),
        };
        Ok(answer)
    }
}

fn insight_row(user_id: i64) -> serde_json::Value {
    json!({
        "insight_id": 1,
        "user_id": user_id,
        "insights": { "financial_report_markdown_summary": "report" },
        "updated_at": "2024-06-01T12:00:00+00:00",
    })
}

#[tokio::test]
async fn report_without_a_model_stores_placeholders() {
    let app = TestApp::spawn().await;
    app.mock_user(6).await;
    app.mock_catalog().await;
    app.mock_empty_records(6).await;
    app.mock_table("POST", TABLE, any(), 201, json!([insight_row(6)])).await;

    let res = app.post_json("users/6/insights/financial_report", &json!({})).await;

    assert_eq!(StatusCode::CREATED, res.status());
    let body = body_json(res).await;
    assert_eq!(6, body["user_id"]);
    assert_eq!(
        "Financial report and insights generated and stored successfully.",
        body["message"]
    );
    let summary = &body["stored_insights_summary"];
    assert_eq!("N/A", summary["debt_insight_goal"]);
    assert_eq!("N/A", summary["savings_insight_goal"]);
    assert_eq!("N/A", summary["priority_type"]);

    let sent = app.received_bodies("POST", TABLE).await;
    assert_eq!(6, sent[0]["user_id"]);
    assert_eq!(json!([]), sent[0]["insights"]["priority_assessment"]["priority"]);
    assert!(sent[0]["insights"]["report_generated_at"].is_string());
}

#[tokio::test]
async fn report_is_created_when_the_insert_returns_no_row() {
    let app = TestApp::spawn().await;
    app.mock_user(6).await;
    app.mock_catalog().await;
    app.mock_empty_records(6).await;
    app.mock_table("POST", TABLE, any(), 201, json!([])).await;

    let res = app.post_json("users/6/insights/financial_report", &json!({})).await;

    assert_eq!(StatusCode::CREATED, res.status());
    assert_eq!(6, body_json(res).await["user_id"]);

    let sent = app.received_bodies("POST", TABLE).await;
    assert_eq!(1, sent.len());
    assert_eq!(sent[0]["updated_at"], sent[0]["insights"]["report_generated_at"]);
}

#[tokio::test]
async fn report_runs_every_agent() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = TestApp::spawn_with_model(CannedModel {
        calls: calls.clone(),
        fail: false,
    })
    .await;
    app.mock_user(6).await;
    app.mock_catalog().await;
    app.mock_empty_records(6).await;
    app.mock_table("POST", TABLE, any(), 201, json!([insight_row(6)])).await;

    let res = app.post_json("users/6/insights/financial_report", &json!({})).await;

    assert_eq!(StatusCode::CREATED, res.status());
    let summary = body_json(res).await["stored_insights_summary"].clone();
    assert_eq!("debt", summary["priority_type"]);
    assert_eq!("Become debt free", summary["debt_insight_goal"]);
    // diagnostics, prioritization, then a strategy and a summary for debt and savings
    assert_eq!(6, calls.load(Ordering::SeqCst));

    let sent = app.received_bodies("POST", TABLE).await;
    let priority = &sent[0]["insights"]["priority_assessment"];
    assert_eq!(6, priority["user_id"]);
    assert_eq!(json!(["debt", "savings"]), priority["priority"]);
}

#[tokio::test]
async fn failing_model_returns_500_and_stores_nothing() {
    let app = TestApp::spawn_with_model(CannedModel {
        calls: Arc::default(),
        fail: true,
    })
    .await;
    app.mock_user(6).await;
    app.mock_catalog().await;
    app.mock_empty_records(6).await;

    let res = app.post_json("users/6/insights/financial_report", &json!({})).await;

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    assert!(app.received_bodies("POST", TABLE).await.is_empty());
}

#[tokio::test]
async fn report_for_unknown_user_returns_404() {
    let app = TestApp::spawn().await;
    app.mock_missing_user(6).await;

    let res = app.post_json("users/6/insights/financial_report", &json!({})).await;

    assert_eq!(StatusCode::NOT_FOUND, res.status());
    assert_eq!("User with ID 6 not found.", body_json(res).await["detail"]);
}

#[tokio::test]
async fn latest_returns_the_newest_insight() {
    let app = TestApp::spawn().await;
    app.mock_user(6).await;
    app.mock_table(
        "GET",
        TABLE,
        query_param("order", "updated_at.desc"),
        200,
        json!([insight_row(6)]),
    )
    .await;

    let res = app.get("users/6/insights/latest").await;

    assert_eq!(StatusCode::OK, res.status());
    let body = body_json(res).await;
    assert_eq!(1, body["insight_id"]);
    assert_eq!("report", body["insights"]["financial_report_markdown_summary"]);
}

#[tokio::test]
async fn latest_without_insights_returns_404() {
    let app = TestApp::spawn().await;
    app.mock_user(6).await;
    app.mock_table("GET", TABLE, any(), 200, json!([])).await;

    let res = app.get("users/6/insights/latest").await;

    assert_eq!(StatusCode::NOT_FOUND, res.status());
    assert_eq!("No insights found for user ID 6.", body_json(res).await["detail"]);
}
