use reqwest::StatusCode;

use serde_json::json;

use wiremock::matchers::*;

use crate::helpers::{body_json, TestApp};

#[tokio::test]
async fn listing_records_of_unknown_user_returns_404() {
    let app = TestApp::spawn().await;
    app.mock_missing_user(8).await;

    for url in ["users/8/income", "users/8/debts", "users/8/expenses"] {
        let res = app.get(url).await;
        assert_eq!(StatusCode::NOT_FOUND, res.status(), "Unexpected status for {}", url);
    }
}

#[tokio::test]
async fn income_is_listed_for_the_user() {
    let app = TestApp::spawn().await;
    app.mock_user(2).await;
    app.mock_table(
        "GET",
        "income",
        query_param("user_id", "eq.2"),
        200,
        json!([
            { "income_id": 1, "user_id": 2, "income_source": "Salary", "monthly_income": 3100.0 },
            { "income_id": 2, "user_id": 2, "income_source": "Rent", "monthly_income": 450.25 },
        ]),
    )
    .await;

    let res = app.get("users/2/income").await;

    assert_eq!(StatusCode::OK, res.status());
    let body = body_json(res).await;
    assert_eq!("Rent", body[1]["income_source"]);
    assert_eq!(450.25, body[1]["monthly_income"]);
}

#[tokio::test]
async fn new_expense_without_timestamp_gets_current_time() {
    let app = TestApp::spawn().await;
    app.mock_user(2).await;
    app.mock_table(
        "POST",
        "expenses",
        body_partial_json(json!({ "user_id": 2, "expense_category": "Rent" })),
        201,
        json!([{
            "expense_id": 5,
            "user_id": 2,
            "expense_category": "Rent",
            "monthly_amount": 900.0,
            "timestamp": "2024-05-01T00:00:00+00",
        }]),
    )
    .await;

    let res = app
        .post_json(
            "users/2/expenses",
            &json!({ "expense_category": "Rent", "monthly_amount": 900.0 }),
        )
        .await;

    assert_eq!(StatusCode::CREATED, res.status());
    assert_eq!(5, body_json(res).await["expense_id"]);

    let sent = app.received_bodies("POST", "expenses").await;
    assert_eq!(1, sent.len());
    assert!(sent[0]["timestamp"].is_string(), "No timestamp was sent: {}", sent[0]);
}

#[tokio::test]
async fn missing_debt_returns_404_with_owner() {
    let app = TestApp::spawn().await;
    app.mock_user(2).await;
    app.mock_table("GET", "debts", query_param("debt_id", "eq.77"), 200, json!([]))
        .await;

    let res = app.get("users/2/debts/77").await;

    assert_eq!(StatusCode::NOT_FOUND, res.status());
    assert_eq!(
        "Debt record with ID 77 not found for user 2.",
        body_json(res).await["detail"]
    );
}

#[tokio::test]
async fn empty_debt_update_returns_400() {
    let app = TestApp::spawn().await;
    app.mock_user(2).await;
    app.mock_table(
        "GET",
        "debts",
        query_param("debt_id", "eq.3"),
        200,
        json!([{ "debt_id": 3, "user_id": 2, "account_name": "Visa", "current_balance": 1200.0 }]),
    )
    .await;

    let res = app.put_json("users/2/debts/3", &json!({ "interest_rate": null })).await;

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    assert_eq!("No update data provided.", body_json(res).await["detail"]);
}

#[tokio::test]
async fn update_is_scoped_to_the_owner() {
    let app = TestApp::spawn().await;
    app.mock_user(2).await;
    app.mock_table(
        "GET",
        "income",
        query_param("income_id", "eq.4"),
        200,
        json!([{ "income_id": 4, "user_id": 2, "income_source": "Salary", "monthly_income": 3000.0 }]),
    )
    .await;
    app.mock_table(
        "PATCH",
        "income",
        query_param("user_id", "eq.2"),
        200,
        json!([{ "income_id": 4, "user_id": 2, "income_source": "Salary", "monthly_income": 3300.0 }]),
    )
    .await;

    let res = app.put_json("users/2/income/4", &json!({ "monthly_income": 3300.0 })).await;

    assert_eq!(StatusCode::OK, res.status());
    assert_eq!(3300.0, body_json(res).await["monthly_income"]);
    assert_eq!(
        vec![json!({ "monthly_income": 3300.0 })],
        app.received_bodies("PATCH", "income").await
    );
}

#[tokio::test]
async fn update_without_returned_row_answers_with_the_stored_record() {
    let app = TestApp::spawn().await;
    app.mock_user(2).await;
    app.mock_table(
        "GET",
        "income",
        query_param("income_id", "eq.4"),
        200,
        json!([{ "income_id": 4, "user_id": 2, "income_source": "Salary", "monthly_income": 3300.0 }]),
    )
    .await;
    app.mock_table("PATCH", "income", query_param("user_id", "eq.2"), 200, json!([]))
        .await;

    let res = app.put_json("users/2/income/4", &json!({ "monthly_income": 3300.0 })).await;

    assert_eq!(StatusCode::OK, res.status());
    let body = body_json(res).await;
    assert_eq!(4, body["income_id"]);
    assert_eq!(3300.0, body["monthly_income"]);
}

#[tokio::test]
async fn delete_missing_expense_returns_404() {
    let app = TestApp::spawn().await;
    app.mock_user(2).await;
    app.mock_table("GET", "expenses", query_param("expense_id", "eq.6"), 200, json!([]))
        .await;

    let res = app.delete("users/2/expenses/6").await;

    assert_eq!(StatusCode::NOT_FOUND, res.status());
    assert_eq!(
        "Expense record with ID 6 not found for user 2 to delete.",
        body_json(res).await["detail"]
    );
}

#[tokio::test]
async fn delete_expense_returns_204() {
    let app = TestApp::spawn().await;
    app.mock_user(2).await;
    let row = json!([{ "expense_id": 6, "user_id": 2, "monthly_amount": 10.0 }]);
    app.mock_table("GET", "expenses", query_param("expense_id", "eq.6"), 200, row.clone())
        .await;
    app.mock_table("DELETE", "expenses", query_param("expense_id", "eq.6"), 200, row)
        .await;

    let res = app.delete("users/2/expenses/6").await;

    assert_eq!(StatusCode::NO_CONTENT, res.status());
}
