//! HTTP tests for token issuance, certificates, event maintenance and health

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use ev_api::create_app;
use ev_api::dto::AttendanceTokenResponse;
use ev_core::RegistrationRepository;
use ev_shared::{error_codes, CorsConfig, ErrorResponse, HealthResponse, HealthStatus};

use common::*;

macro_rules! app {
    ($ctx:expr) => {
        test::init_service(create_app(
            $ctx.state.clone(),
            &CorsConfig::default(),
            MAX_PAYLOAD,
        ))
        .await
    };
}

fn post(uri: &str) -> test::TestRequest {
    test::TestRequest::post().uri(uri)
}

fn mark_certificate(registration_id: i64) -> test::TestRequest {
    post("/api/v1/certificates/mark-received").set_json(json!({ "registration_id": registration_id }))
}

#[actix_web::test]
async fn test_issue_token_is_idempotent() {
    let ctx = context();
    ctx.repository.insert(registration(1, EVENT_ID)).await.unwrap();
    let app = app!(ctx);

    let resp = test::call_service(&app, post("/api/v1/registrations/1/token").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let first: AttendanceTokenResponse = test::read_body_json(resp).await;
    assert_eq!(first.attendance_token.as_deref(), Some(FIRST_TOKEN));
    assert_eq!(first.token_generated_at, Some(start_time()));
    assert_eq!(
        first.token_expires_at,
        Some(start_time() + chrono::Duration::hours(24))
    );

    let resp = test::call_service(&app, post("/api/v1/registrations/1/token").to_request()).await;
    let second: AttendanceTokenResponse = test::read_body_json(resp).await;
    assert_eq!(second.attendance_token.as_deref(), Some(FIRST_TOKEN));
}

#[actix_web::test]
async fn test_reissue_token_replaces_previous() {
    let ctx = context();
    let old = ctx.registered_with_token(1, EVENT_ID).await;
    let app = app!(ctx);

    let resp = test::call_service(
        &app,
        post("/api/v1/registrations/1/token/reissue").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: AttendanceTokenResponse = test::read_body_json(resp).await;
    assert_eq!(body.attendance_token.as_deref(), Some(SECOND_TOKEN));

    assert!(!ctx.repository.token_exists(&old).await.unwrap());
    let resp = test::call_service(
        &app,
        post("/api/v1/attendance/verify")
            .set_json(json!({ "token": old, "event_id": EVENT_ID }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_issue_token_unknown_registration() {
    let ctx = context();
    let app = app!(ctx);

    let resp = test::call_service(&app, post("/api/v1/registrations/9/token").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, error_codes::REGISTRATION_NOT_FOUND);
}

#[actix_web::test]
async fn test_reissue_after_verification_conflicts() {
    let ctx = context();
    let token = ctx.registered_with_token(1, EVENT_ID).await;
    let app = app!(ctx);

    test::call_service(
        &app,
        post("/api/v1/attendance/verify")
            .set_json(json!({ "token": token, "event_id": EVENT_ID }))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        post("/api/v1/registrations/1/token/reissue").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, error_codes::ALREADY_VERIFIED);
}

#[actix_web::test]
async fn test_certificate_requires_attendance() {
    let ctx = context();
    let token = ctx.registered_with_token(1, EVENT_ID).await;
    let app = app!(ctx);

    let resp = test::call_service(&app, mark_certificate(1).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, error_codes::NOT_ELIGIBLE_FOR_CERTIFICATE);

    test::call_service(
        &app,
        post("/api/v1/attendance/verify")
            .set_json(json!({ "token": token, "event_id": EVENT_ID }))
            .to_request(),
    )
    .await;

    let resp = test::call_service(&app, mark_certificate(1).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");

    let stored = ctx.repository.find_by_id(1).await.unwrap().unwrap();
    assert!(stored.has_received_certificate);

    let resp = test::call_service(&app, mark_certificate(1).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_certificate_unknown_registration() {
    let ctx = context();
    let app = app!(ctx);

    let resp = test::call_service(&app, mark_certificate(404).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_absentees_and_summary() {
    let ctx = context();
    let token = ctx.registered_with_token(1, EVENT_ID).await;
    ctx.repository.insert(registration(2, EVENT_ID)).await.unwrap();
    ctx.repository.insert(registration(3, EVENT_ID)).await.unwrap();
    ctx.repository.insert(registration(4, OTHER_EVENT_ID)).await.unwrap();
    let app = app!(ctx);

    test::call_service(
        &app,
        post("/api/v1/attendance/verify")
            .set_json(json!({ "token": token, "event_id": EVENT_ID }))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        post(&format!("/api/v1/events/{}/absentees", EVENT_ID)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["marked_absent"], 2);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/events/{}/attendance-summary", EVENT_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["event_id"], EVENT_ID);
    assert_eq!(body["total"], 3);
    assert_eq!(body["present"], 1);
    assert_eq!(body["absent"], 2);
    assert_eq!(body["pending"], 0);

    let rate = body["attendance_rate"].as_f64().unwrap();
    assert!((rate - 1.0 / 3.0).abs() < 1e-9);
}

#[actix_web::test]
async fn test_health_check() {
    let ctx = context();
    let app = app!(ctx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: HealthResponse = test::read_body_json(resp).await;
    assert_eq!(body.status, HealthStatus::Healthy);
    assert!(body.services.contains_key("registration_store"));
}
