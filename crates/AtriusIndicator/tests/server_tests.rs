use std::sync::Arc;

use atrius_indicator_expr::handlers::AppState;
use atrius_indicator_expr::server::{ServerConfig, create_app};
use atrius_indicator_expr::{IndicatorEngine, MetadataSnapshot};
use axum_test::TestServer;
use serde_json::{Value, json};

fn test_server() -> TestServer {
    let snapshot = MetadataSnapshot::new()
        .with_data_element("anc1", "ANC first visit", ["fixed", "outreach"])
        .with_category_option_combo("fixed", "Fixed")
        .with_category_option_combo("outreach", "Outreach")
        .with_constant("factor", "Reporting factor", 1.5)
        .with_org_unit_group("rural", "Rural facilities", 7);
    let state = Arc::new(AppState {
        engine: IndicatorEngine::from_snapshot(snapshot),
    });
    let app = create_app(&ServerConfig::default(), state);
    TestServer::new(app).expect("test server")
}

#[tokio::test]
async fn health_check_reports_ok() {
    let server = test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "indicator-server");
}

#[tokio::test]
async fn validate_returns_valid_with_description() {
    let server = test_server();
    let response = server
        .post("/api/expressions/validate")
        .json(&json!({"expression": "#{anc1.fixed}*C{factor}"}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "VALID");
    assert_eq!(body["description"], "ANC first visit:Fixed*Reporting factor");
}

#[tokio::test]
async fn validate_reports_violations_without_an_http_error() {
    let server = test_server();
    let response = server
        .post("/api/expressions/validate")
        .json(&json!({"expression": "#{deX.fixed}"}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ERROR");
    assert_eq!(body["code"], "data_element_not_found");
}

#[tokio::test]
async fn description_endpoint_renders_display_names() {
    let server = test_server();
    let response = server
        .post("/api/expressions/description")
        .json(&json!({"expression": "OUG{rural}/[days]"}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["description"], "Rural facilities/Number of days");
}

#[tokio::test]
async fn description_endpoint_rejects_unresolved_references() {
    let server = test_server();
    let response = server
        .post("/api/expressions/description")
        .json(&json!({"expression": "C{unknown}"}))
        .await;
    response.assert_status(http::StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["status"], "ERROR");
    assert_eq!(body["code"], "unresolved_reference");
}

#[tokio::test]
async fn explode_endpoint_expands_totals() {
    let server = test_server();
    let response = server
        .post("/api/expressions/explode")
        .json(&json!({"expression": "#{anc1}"}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["exploded"], "(#{anc1.fixed}+#{anc1.outreach})");
}

#[tokio::test]
async fn evaluate_endpoint_computes_a_result() {
    let server = test_server();
    let response = server
        .post("/api/expressions/evaluate")
        .json(&json!({
            "expression": "#{anc1}*C{factor}",
            "context": {
                "values": [
                    {"dataElement": "anc1", "categoryOptionCombo": "fixed", "value": 10.0},
                    {"dataElement": "anc1", "categoryOptionCombo": "outreach", "value": 5.0}
                ]
            }
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["skipped"], false);
    assert_eq!(body["value"], 22.5);
    assert_eq!(body["generated"], "(10.0+5.0)*1.5");
}

#[tokio::test]
async fn evaluate_endpoint_honours_the_skip_policy() {
    let server = test_server();
    let response = server
        .post("/api/expressions/evaluate")
        .json(&json!({
            "expression": "#{anc1.fixed}+#{anc1.outreach}",
            "missingValuePolicy": "SKIP_IF_ANY_MISSING",
            "context": {
                "values": [
                    {"dataElement": "anc1", "categoryOptionCombo": "fixed", "value": 10.0}
                ]
            }
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["skipped"], true);
    assert!(body.get("value").is_none());
}

#[tokio::test]
async fn evaluate_endpoint_reports_no_result_for_missing_values() {
    let server = test_server();
    let response = server
        .post("/api/expressions/evaluate")
        .json(&json!({
            "expression": "#{anc1.fixed}+#{anc1.outreach}",
            "context": {
                "values": [
                    {"dataElement": "anc1", "categoryOptionCombo": "fixed", "value": 10.0}
                ]
            }
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["skipped"], false);
    assert!(body.get("value").is_none());
    assert_eq!(body["generated"], "10.0+null");
}
