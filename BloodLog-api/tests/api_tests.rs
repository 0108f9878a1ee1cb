use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use blood_log_api::api::{routes::create_app, AppState};
use blood_log_domain::credentials::CredentialStore;
use blood_log_domain::services::ReadingService;
use blood_log_domain::testing::{
    create_mock_reading_service, create_signed_in_reading_service, mock_collaborator, MOCK_PASSWORD, MOCK_SECRET,
    MOCK_USERNAME, MOCK_USER_ID,
};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn signed_in_app() -> Router {
    let state = AppState::new(Arc::new(create_signed_in_reading_service().unwrap()), utc())
        .with_collaborator("in-memory")
        .with_clock(fixed_now);
    create_app(state)
}

fn signed_out_app() -> Router {
    let state = AppState::new(Arc::new(create_mock_reading_service().unwrap()), utc())
        .with_collaborator("in-memory")
        .with_clock(fixed_now);
    create_app(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

fn ids(readings: &Value) -> Vec<String> {
    readings
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_data_routes_require_session() {
    let app = signed_out_app();

    for uri in [
        "/api/v1/dashboard",
        "/api/v1/chart",
        "/api/v1/history",
        "/api/v1/history/years",
        "/api/v1/medical",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["error"], "signed_out");
    }
}

#[tokio::test]
async fn test_login_flow() {
    let app = signed_out_app();

    let (status, body) = send(&app, Method::GET, "/auth/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "signed_in": false, "user_id": MOCK_USER_ID }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        Some(json!({ "username": MOCK_USERNAME, "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        Some(json!({ "username": "", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        Some(json!({ "username": MOCK_USERNAME, "password": MOCK_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["signed_in"], true);

    let (status, _) = send(&app, Method::GET, "/api/v1/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::POST, "/auth/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["signed_in"], false);

    let (status, _) = send(&app, Method::GET, "/api/v1/dashboard", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dashboard_shape() {
    let app = signed_in_app();
    let (status, body) = send(&app, Method::GET, "/api/v1/dashboard", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["range_days"], 7);
    assert_eq!(ids(&body["recent"]), vec!["r1", "r2", "r3", "r4", "r5"]);

    // r2 averages its two measurements
    let r2 = &body["recent"][1];
    assert_eq!(r2["effective"]["systolic"], 130.0);
    assert_eq!(r2["effective"]["diastolic"], 85.0);
    assert_eq!(r2["status"], "stage1");
    assert_eq!(body["recent"][2]["status"], "stage2");

    let labels: Vec<&str> = body["chart"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["03-19", "03-20"]);
}

#[tokio::test]
async fn test_unsupported_range_is_rejected() {
    let app = signed_in_app();
    let (status, body) = send(&app, Method::GET, "/api/v1/dashboard?range=9", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_chart_uses_loaded_readings() {
    let app = signed_in_app();

    // nothing loaded yet
    let (status, body) = send(&app, Method::GET, "/api/v1/chart?range=14", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points"], json!([]));

    send(&app, Method::GET, "/api/v1/dashboard", None).await;

    let (_, body) = send(&app, Method::GET, "/api/v1/chart?range=14", None).await;
    assert_eq!(body["range_days"], 14);
    let labels: Vec<&str> = body["points"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["03-11", "03-12", "03-19", "03-20"]);
}

#[tokio::test]
async fn test_history_defaults_to_current_month() {
    let app = signed_in_app();
    let (status, body) = send(&app, Method::GET, "/api/v1/history", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["year"], 2024);
    assert_eq!(body["month"], 3);

    let rows = body["rows"].as_array().unwrap();
    let kinds: Vec<&str> = rows.iter().map(|r| r["kind"].as_str().unwrap()).collect();
    assert_eq!(
        kinds,
        vec!["reading", "reading", "summary", "reading", "reading", "summary"]
    );

    assert_eq!(rows[0]["reading"]["id"], "r1");
    assert_eq!(rows[2]["systolic"], 124.0);
    assert_eq!(rows[2]["count"], 2);
}

#[tokio::test]
async fn test_history_of_another_month() {
    let app = signed_in_app();

    let (status, body) = send(&app, Method::GET, "/api/v1/history?year=2024&month=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"].as_array().unwrap().len(), 2);

    let (status, _) = send(&app, Method::GET, "/api/v1/history?year=2024&month=13", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_years() {
    let app = signed_in_app();
    let (status, body) = send(&app, Method::GET, "/api/v1/history/years", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["years"], json!([2024, 2023, 2022, 2021, 2020, 2019]));
}

#[tokio::test]
async fn test_reading_lifecycle() {
    let app = signed_in_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/readings",
        Some(json!({
            "date": "2024-03-21",
            "time_slot": "evening",
            "sbp_1": 126,
            "dbp_1": 82,
            "pulse_1": 70,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total"], 6);

    let created = body["readings"][0].clone();
    assert_eq!(created["day"], "2024-03-21");
    assert_eq!(created["time_slot"], "evening");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/readings/{}", id),
        Some(json!({
            "date": "2024-03-21",
            "time_slot": "evening",
            "sbp_1": 150,
            "dbp_1": 95,
            "pulse_1": 70,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["readings"][0]["status"], "stage2");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/readings/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);

    let (status, body) = send(&app, Method::DELETE, "/api/v1/readings/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_invalid_reading_is_rejected() {
    let app = signed_in_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/readings",
        Some(json!({
            "date": "2024-03-21",
            "time_slot": "morning",
            "sbp_1": 500,
            "dbp_1": 80,
            "pulse_1": 70,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("Systolic"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/readings",
        Some(json!({
            "date": "2024-03-21",
            "time_slot": "morning",
            "sbp_1": 120,
            "dbp_1": 80,
            "pulse_1": 70,
            "sbp_2": 118,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_medical_records() {
    let app = signed_in_app();

    let (status, body) = send(&app, Method::GET, "/api/v1/medical", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["records"][0]["report_image_url"], "memory://reports/m1/report.png");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/medical",
        Some(json!({
            "check_date": "2024-03-15",
            "attachment": {
                "file_name": "report.png",
                "mime_type": "image/png",
                "data": "data:image/png;base64,iVBORw0KGgo=",
            },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total"], 2);
    assert_eq!(body["records"][0]["day"], "2024-03-15");
    let id = body["records"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/medical/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_medical_attachment_must_be_an_image() {
    let app = signed_in_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/medical",
        Some(json!({
            "check_date": "2024-03-15",
            "attachment": {
                "file_name": "notes.txt",
                "mime_type": "text/plain",
                "data": "aGVsbG8=",
            },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_health_reports_session() {
    let (status, body) = send(&signed_out_app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["session"]["status"], "degraded");
    assert_eq!(body["components"]["collaborator"]["message"], "in-memory, not contacted yet");

    let (status, body) = send(&signed_in_app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_health_reports_unreachable_collaborator() {
    let collaborator = mock_collaborator().unwrap();
    let credentials = CredentialStore::in_memory();
    credentials.set(MOCK_SECRET).unwrap();
    let service = ReadingService::new(collaborator.clone(), credentials, MOCK_USER_ID);
    let app = create_app(
        AppState::new(Arc::new(service), utc())
            .with_collaborator("in-memory")
            .with_clock(fixed_now),
    );

    let (status, _) = send(&app, Method::GET, "/api/v1/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["components"]["collaborator"]["status"], "ok");

    collaborator.set_offline(true).unwrap();
    let (status, body) = send(&app, Method::GET, "/api/v1/dashboard", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "collaborator_error");

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["collaborator"]["status"], "degraded");
}

#[tokio::test]
async fn test_delete_with_blank_id_is_bad_request() {
    let app = signed_in_app();

    let (status, body) = send(&app, Method::DELETE, "/api/v1/readings/%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = send(&app, Method::DELETE, "/api/v1/medical/%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_security_headers_are_set() {
    let app = signed_in_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}
