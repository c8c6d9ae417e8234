mod common;

use axum::http::StatusCode;
use common::{server, ScriptedBackend};
use serde_json::json;

const REPORT: &str = "A viral post claims polling booths will close at noon on election day.";

#[tokio::test]
async fn test_verify_news() {
    let backend = ScriptedBackend::replying(
        r#"{"verificationResult": "Likely false. The election commission lists booth hours as 7am to 6pm."}"#,
    );
    let server = server(backend.clone()).await;

    let response = server
        .post("/api/news/verify")
        .json(&json!({ "news_report": REPORT }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["verification_result"].as_str().unwrap().starts_with("Likely false"));

    let prompts = backend.prompts.lock().unwrap();
    assert_eq!(prompts[0].flow, "crossVerifyFakeNews");
    assert!(prompts[0].user.contains(REPORT));
}

#[tokio::test]
async fn test_verify_news_too_short() {
    let backend = ScriptedBackend::new(vec![]);
    let server = server(backend.clone()).await;

    let response = server
        .post("/api/news/verify")
        .json(&json!({ "news_report": "booths close" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_verify_news_blank_result() {
    let backend = ScriptedBackend::replying(r#"{"verificationResult": "   "}"#);
    let server = server(backend).await;

    let response = server
        .post("/api/news/verify")
        .json(&json!({ "news_report": REPORT }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
}
