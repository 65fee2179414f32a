use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use secscan::api::{self, AppState};
use secscan::{AIProvider, AnalysisService};

mod common;
use common::MockEngine;

fn state_with_engine(engine: Arc<MockEngine>) -> AppState {
    let service = Arc::new(AnalysisService::new(engine, 3600));
    AppState::with_service(service, AIProvider::Groq, "llama-3.3-70b-versatile")
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(api::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn health_reports_engine_and_model() {
    let engine = Arc::new(MockEngine::new(&[]));
    let app = init_app!(state_with_engine(engine));

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "active");
    assert_eq!(body["engine"], "groq");
    assert_eq!(body["model"], "llama-3.3-70b-versatile");
}

#[actix_web::test]
async fn analyze_empty_code_returns_empty_errors_without_engine_call() {
    let engine = Arc::new(MockEngine::new(&[]));
    let app = init_app!(state_with_engine(engine.clone()));

    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_json(json!({"code": "   \n"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({"errors": []}));
    assert_eq!(engine.calls(), 0);
}

#[actix_web::test]
async fn analyze_returns_sanitized_findings() {
    let response = r#"{"errors": [
        {"line": 1, "message": "Hardcoded API key", "recommendation": "Use the environment", "severity": "high"},
        {"line": 50, "message": "out of range", "recommendation": "r"}
    ]}"#;
    let engine = Arc::new(MockEngine::new(&[response]));
    let app = init_app!(state_with_engine(engine));

    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_json(json!({"code": "const key = \"sk-123\";\nuse(key);\n"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["line"], 1);
    assert_eq!(errors[0]["severity"], "high");
}

#[actix_web::test]
async fn rate_limited_engine_surfaces_as_429() {
    let engine = Arc::new(MockEngine::rate_limited());
    let app = init_app!(state_with_engine(engine));

    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_json(json!({"code": "SELECT * FROM users;"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("rate limit"));
}

#[actix_web::test]
async fn fix_with_missing_description_is_a_client_error() {
    let engine = Arc::new(MockEngine::new(&[]));
    let app = init_app!(state_with_engine(engine.clone()));

    let req = test::TestRequest::post()
        .uri("/fix")
        .set_json(json!({"original_code": "eval(input())"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(engine.calls(), 0);
}

#[actix_web::test]
async fn fix_returns_normalized_change_list() {
    let response = r#"{"changes": [{"search": "eval(input())", "replace": "ast.literal_eval(input())"}]}"#;
    let engine = Arc::new(MockEngine::new(&[response]));
    let app = init_app!(state_with_engine(engine));

    let req = test::TestRequest::post()
        .uri("/fix")
        .set_json(json!({
            "original_code": "eval(input())",
            "vulnerability_description": "Arbitrary code execution via eval",
            "vulnerability_line": 1
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body,
        json!({"changes": [{"search": "eval(input())", "replace": "ast.literal_eval(input())"}]})
    );
}

#[actix_web::test]
async fn scan_dependencies_without_manifest_is_empty_success() {
    let engine = Arc::new(MockEngine::new(&[]));
    let app = init_app!(state_with_engine(engine.clone()));

    let req = test::TestRequest::post()
        .uri("/scan-dependencies")
        .set_json(json!({"code": "print('hi')"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({"vulnerabilities": [], "scanned_files": []}));
    assert_eq!(engine.calls(), 0);
}

#[actix_web::test]
async fn scan_dependencies_reports_manifest_family() {
    let response = r#"{"vulnerabilities": [
        {"package": "rails", "version": "5.2.0", "severity": "critical",
         "message": "Remote code execution", "cve": "CVE-2019-5418",
         "recommendation": "upgrade to 5.2.2.1"}
    ]}"#;
    let engine = Arc::new(MockEngine::new(&[response]));
    let app = init_app!(state_with_engine(engine));

    let req = test::TestRequest::post()
        .uri("/scan-dependencies")
        .set_json(json!({"code": "source 'https://rubygems.org'\ngem 'rails', '5.2.0'\n"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["scanned_files"], json!(["Gemfile"]));
    assert_eq!(body["vulnerabilities"][0]["package"], "rails");
    assert_eq!(body["vulnerabilities"][0]["cve"], "CVE-2019-5418");
}
