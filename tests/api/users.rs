use reqwest::StatusCode;

use serde_json::json;

use wiremock::matchers::*;

use crate::helpers::{body_json, postgres_error, profile_json, TestApp};

#[tokio::test]
async fn create_profile_returns_201_with_stored_row() {
    let app = TestApp::spawn().await;
    app.mock_table(
        "POST",
        "users",
        body_partial_json(json!({ "age": 34 })),
        201,
        json!([profile_json(5)]),
    )
    .await;

    let res = app.post_json("users", &json!({ "age": 34, "num_children": 2 })).await;

    assert_eq!(StatusCode::CREATED, res.status());
    let body = body_json(res).await;
    assert_eq!(5, body["user_id"]);
    assert_eq!("married", body["marital_status"]);
}

#[tokio::test]
async fn create_profile_conflict_returns_409() {
    let app = TestApp::spawn().await;
    app.mock_table(
        "POST",
        "users",
        any(),
        409,
        postgres_error("23505", "duplicate key value violates unique constraint \"users_pkey\"", ""),
    )
    .await;

    let res = app.post_json("users", &json!({ "age": 34 })).await;

    assert_eq!(StatusCode::CONFLICT, res.status());
}

#[tokio::test]
async fn get_profile_returns_404_for_unknown_user() {
    let app = TestApp::spawn().await;
    app.mock_missing_user(42).await;

    let res = app.get("users/42/profile").await;

    assert_eq!(StatusCode::NOT_FOUND, res.status());
    assert_eq!("User profile with ID 42 not found.", body_json(res).await["detail"]);
}

#[tokio::test]
async fn non_positive_user_ids_are_rejected_with_422() {
    let app = TestApp::spawn().await;

    for url in ["users/0/profile", "users/-3/profile", "users/abc/profile"] {
        let res = app.get(url).await;
        assert_eq!(
            StatusCode::UNPROCESSABLE_ENTITY,
            res.status(),
            "The API did not reject {}",
            url
        );
    }
}

#[tokio::test]
async fn update_profile_with_no_fields_returns_400() {
    let app = TestApp::spawn().await;
    app.mock_user(7).await;

    let test_cases = vec![
        (json!({}), "empty object"),
        (json!({ "age": null, "goals": null }), "only nulls"),
    ];

    for (body, description) in test_cases {
        let res = app.put_json("users/7/profile", &body).await;
        assert_eq!(
            StatusCode::BAD_REQUEST,
            res.status(),
            "The API did not reject a body with {}",
            description
        );
        assert_eq!("No update data provided.", body_json(res).await["detail"]);
    }
}

#[tokio::test]
async fn update_profile_sends_only_provided_fields() {
    let app = TestApp::spawn().await;
    app.mock_user(7).await;
    let mut updated = profile_json(7);
    updated["age"] = json!(35);
    app.mock_table("PATCH", "users", query_param("user_id", "eq.7"), 200, json!([updated]))
        .await;

    let res = app.put_json("users/7/profile", &json!({ "age": 35 })).await;

    assert_eq!(StatusCode::OK, res.status());
    assert_eq!(35, body_json(res).await["age"]);
    assert_eq!(vec![json!({ "age": 35 })], app.received_bodies("PATCH", "users").await);
}

#[tokio::test]
async fn update_without_returned_row_fetches_the_profile_again() {
    let app = TestApp::spawn().await;
    app.mock_user(7).await;
    app.mock_table("PATCH", "users", query_param("user_id", "eq.7"), 200, json!([]))
        .await;

    let res = app.put_json("users/7/profile", &json!({ "age": 35 })).await;

    assert_eq!(StatusCode::OK, res.status());
    let body = body_json(res).await;
    assert_eq!(7, body["user_id"]);
    assert_eq!(34, body["age"]);
}

#[tokio::test]
async fn update_without_any_confirmation_returns_500() {
    let app = TestApp::spawn().await;
    app.mock_table(
        "GET",
        "users",
        query_param("select", "user_id"),
        200,
        json!([{ "user_id": 7 }]),
    )
    .await;
    app.mock_table("GET", "users", query_param("select", "*"), 200, json!([]))
        .await;
    app.mock_table("PATCH", "users", query_param("user_id", "eq.7"), 200, json!([]))
        .await;

    let res = app.put_json("users/7/profile", &json!({ "age": 35 })).await;

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    assert_eq!(
        "User profile for 7 updated, but failed to retrieve confirmation.",
        body_json(res).await["detail"]
    );
}

#[tokio::test]
async fn delete_profile_returns_204() {
    let app = TestApp::spawn().await;
    app.mock_user(7).await;
    app.mock_table("DELETE", "users", query_param("user_id", "eq.7"), 200, json!([profile_json(7)]))
        .await;

    let res = app.delete("users/7/profile").await;

    assert_eq!(StatusCode::NO_CONTENT, res.status());
}

#[tokio::test]
async fn comprehensive_details_returns_every_section() {
    let app = TestApp::spawn().await;
    app.mock_user(3).await;
    app.mock_catalog().await;
    app.mock_table(
        "GET",
        "user_financial_knowledge",
        query_param("user_id", "eq.3"),
        200,
        json!([
            { "user_id": 3, "category": "Budgeting", "level": 2 },
            { "user_id": 3, "category": null, "level": 1 },
        ]),
    )
    .await;
    app.mock_table(
        "GET",
        "income",
        query_param("user_id", "eq.3"),
        200,
        json!([{ "income_id": 1, "user_id": 3, "income_source": "Salary", "monthly_income": 4200.5 }]),
    )
    .await;
    app.mock_table("GET", "debts", query_param("user_id", "eq.3"), 200, json!([])).await;
    app.mock_table(
        "GET",
        "expenses",
        query_param("order", "timestamp.desc"),
        200,
        json!([{
            "expense_id": 9,
            "user_id": 3,
            "expense_category": "Groceries",
            "monthly_amount": 12.75,
            "timestamp": "2024-03-01T10:00:00+00:00",
        }]),
    )
    .await;

    let res = app.get("users/3/comprehensive_details").await;

    assert_eq!(StatusCode::OK, res.status());
    let body = body_json(res).await;
    assert_eq!(3, body["profile"]["user_id"]);
    assert_eq!(1, body["financial_knowledge"].as_array().unwrap().len());
    assert_eq!(
        "Keeps a monthly budget",
        body["financial_knowledge"][0]["description"]
    );
    assert_eq!(4200.5, body["income"][0]["monthly_income"]);
    assert_eq!(json!([]), body["debts"]);
    assert_eq!(9, body["expenses"][0]["expense_id"]);
}

#[tokio::test]
async fn comprehensive_details_returns_404_for_unknown_user() {
    let app = TestApp::spawn().await;
    app.mock_missing_user(11).await;

    let res = app.get("users/11/comprehensive_details").await;

    assert_eq!(StatusCode::NOT_FOUND, res.status());
    assert_eq!("User with ID 11 not found.", body_json(res).await["detail"]);
}
