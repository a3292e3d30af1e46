use reqwest::StatusCode;

use crate::helpers::{body_json, TestApp, TITLE, VERSION};

#[tokio::test]
async fn health_check_is_present_and_empty() {
    let app = TestApp::spawn().await;

    let res = app.get("health_check").await;

    assert_eq!(StatusCode::OK, res.status());
    assert_eq!(Some(0), res.content_length());
}

#[tokio::test]
async fn root_welcomes_with_title_and_version() {
    let app = TestApp::spawn().await;

    let res = app.get("").await;

    assert_eq!(StatusCode::OK, res.status());
    let body = body_json(res).await;
    assert_eq!(format!("Welcome to the {}", TITLE), body["message"]);
    assert_eq!(VERSION, body["version"]);
}

#[tokio::test]
async fn missing_database_configuration_answers_503() {
    let app = TestApp::spawn_unconfigured().await;

    let res = app.get("users/1/profile").await;

    assert_eq!(StatusCode::SERVICE_UNAVAILABLE, res.status());
    let body = body_json(res).await;
    assert_eq!(
        "Supabase configuration missing. Server is not properly configured.",
        body["detail"]
    );

    // The rest of the service keeps answering
    assert_eq!(StatusCode::OK, app.get("health_check").await.status());
}

#[tokio::test]
async fn unknown_routes_answer_with_a_json_detail() {
    let app = TestApp::spawn().await;

    for url in ["no_such_route", "users/2/no_such_route"] {
        let res = app.get(url).await;

        assert_eq!(StatusCode::NOT_FOUND, res.status(), "GET /{}", url);
        let body = body_json(res).await;
        assert_eq!("Not Found", body["detail"]);
    }
}

#[tokio::test]
async fn unsupported_method_on_a_record_route_answers_405() {
    let app = TestApp::spawn().await;

    let res = app.delete("users/2/income").await;

    assert_eq!(StatusCode::METHOD_NOT_ALLOWED, res.status());
    let body = body_json(res).await;
    assert_eq!("Method Not Allowed", body["detail"]);
}
