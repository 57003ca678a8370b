mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Local};
use common::{candidate, reconciler, FakeSource};
use sentinel_node::api::{AssigneeResponse, CompanyFilingsResponse, HealthResponse};
use sentinel_node::server::{build_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt; // for oneshot

fn app(dir: &std::path::Path) -> Router {
    let yesterday = Local::now().date_naive() - Duration::days(1);
    let source = FakeSource::default()
        .with(
            "1",
            vec![
                candidate(yesterday, "10-K", "https://archive.test/1/a/10k.htm"),
                candidate(yesterday, "424B5", "https://archive.test/1/b/p.htm"),
            ],
        )
        .with("2", vec![candidate(yesterday, "8-K", "https://archive.test/2/c/8k.htm")]);
    let engine = Arc::new(reconciler(dir, source));
    build_router(AppState::new(engine, CancellationToken::new()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            req = req.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

#[tokio::test]
async fn reconcile_then_query_filings() {
    let dir = tempdir().unwrap();
    let app = app(dir.path());

    let (status, summary) = send(&app, "POST", "/v1/reconcile", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["events_persisted"], 2);
    assert_eq!(summary["events_filtered"], 1);
    assert_eq!(summary["entities_errored"], 0);

    let (status, all) = send(&app, "GET", "/v1/filings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, acme) = send(&app, "GET", "/v1/filings?company_name=Acme%20Corp", None).await;
    let acme = acme.as_array().unwrap();
    assert_eq!(acme.len(), 1);
    assert_eq!(acme[0]["form"], "10-K");
    assert_eq!(acme[0]["company_name"], "Acme Corp");
    assert_eq!(acme[0]["assigned_to"], "dana");

    let (_, blank) = send(&app, "GET", "/v1/filings?form=&assigned_to=lee", None).await;
    assert_eq!(blank.as_array().unwrap().len(), 1);

    let (status, filters) = send(&app, "GET", "/v1/filings/filters", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filters["forms"], serde_json::json!(["10-K", "8-K"]));
    assert_eq!(filters["assignees"], serde_json::json!(["dana", "lee"]));
}

#[tokio::test]
async fn company_endpoints() {
    let dir = tempdir().unwrap();
    let app = app(dir.path());
    send(&app, "POST", "/v1/reconcile", None).await;

    let (status, companies) = send(&app, "GET", "/v1/companies", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(companies.as_array().unwrap().len(), 2);

    let (status, acme) = send(&app, "GET", "/v1/companies/A1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(acme["cik"], "0000000001");
    assert_eq!(acme["latest"]["form"], "10-K");

    let (status, body) = send(&app, "GET", "/v1/companies/A1/filings", None).await;
    assert_eq!(status, StatusCode::OK);
    let listing: CompanyFilingsResponse = serde_json::from_value(body).unwrap();
    assert_eq!(listing.company.name, "Acme Corp");
    assert_eq!(listing.filings.len(), 1);

    let (status, err) = send(&app, "GET", "/v1/companies/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(err["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn reassign_back_fills_filings() {
    let dir = tempdir().unwrap();
    let app = app(dir.path());
    send(&app, "POST", "/v1/reconcile", None).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/v1/companies/A1/assignee",
        Some(serde_json::json!({ "assigned_to": "morgan" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let resp: AssigneeResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.filings_updated, 1);
    assert_eq!(resp.assigned_to.as_deref(), Some("morgan"));

    let (_, rows) = send(&app, "GET", "/v1/filings?assigned_to=morgan", None).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "PUT",
        "/v1/companies/A1/assignee",
        Some(serde_json::json!({ "assigned_to": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assigned_to"], Value::Null);

    let (status, _) = send(
        &app,
        "PUT",
        "/v1/companies/missing/assignee",
        Some(serde_json::json!({ "assigned_to": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_metrics_respond() {
    let dir = tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let health: HealthResponse = serde_json::from_value(body).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.companies, 0);

    let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
