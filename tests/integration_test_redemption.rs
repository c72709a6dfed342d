mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, NaiveDate, Utc};
use common::{sign_webhook_body, TestApp, OFFER_SECRET};
use repair_booking_backend::domain::services::token::{self, TokenPayload, KIND_OFFER, TOKEN_VERSION};
use serde_json::{json, Value};
use sqlx::Row;
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Creates a standard request for zone B over HTTP and returns
/// (request_id, primary offer tokens, more offer tokens).
async fn create_request(app: &TestApp, email: &str) -> (String, Vec<String>, Vec<String>) {
    let payload = json!({
        "name": "Jane Doe",
        "email": email,
        "address": "Main St 1, Springfield",
        "appointment_type": "standard"
    });

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/requests")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    let request_id = body["request_id"].as_str().unwrap().to_string();
    let tokens = |key: &Value| -> Vec<String> {
        key.as_array().unwrap().iter()
            .map(|o| o["token"].as_str().unwrap().to_string())
            .collect()
    };
    (request_id, tokens(&body["primary"]), tokens(&body["more"]["options"]))
}

fn webhook_body(session_id: &str, offer_token: &str) -> String {
    json!({
        "type": "checkout.session.completed",
        "data": { "object": { "id": session_id, "metadata": { "offer_token": offer_token } } }
    }).to_string()
}

async fn post_webhook(app: &TestApp, body: &str) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/webhooks/payment")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-payment-signature", sign_webhook_body(body))
            .body(Body::from(body.to_string())).unwrap()
    ).await.unwrap()
}

async fn count(app: &TestApp, sql: &str) -> i64 {
    sqlx::query(sql).fetch_one(&app.pool).await.unwrap().get::<i64, _>("count")
}

#[tokio::test]
async fn test_full_booking_flow() {
    let app = TestApp::new().await;
    let (request_id, primary, _) = create_request(&app, "jane@example.com").await;
    let offer_token = &primary[0];

    // pre-checkout verification
    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/offers/verify?token={}", offer_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["payload"]["kind"], "offer");

    // selection
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/offers/select")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"token": offer_token}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let request = app.state.request_repo.find_by_id(&request_id).await.unwrap().unwrap();
    assert_eq!(request.status, "selected");

    // checkout
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/checkout")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"token": offer_token}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert!(body["url"].as_str().unwrap().starts_with("https://pay.example.com/"));

    // payment capture webhook commits the booking
    let res = post_webhook(&app, &webhook_body("cs_flow_1", offer_token)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["received"], true);

    let booking = app.state.booking_repo.find_by_payment_session("cs_flow_1").await.unwrap()
        .expect("booking should exist after webhook");
    assert_eq!(booking.request_id, request_id);
    assert_eq!(booking.zone_code, "B");

    let request = app.state.request_repo.find_by_id(&request_id).await.unwrap().unwrap();
    assert_eq!(request.status, "booked");

    // the redeemed window is gone: verification now reports the conflict
    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/offers/verify?token={}", offer_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_webhook_replay_is_idempotent() {
    let app = TestApp::new().await;
    let (_, primary, _) = create_request(&app, "jane@example.com").await;
    let body = webhook_body("cs_replay_1", &primary[0]);

    let res = post_webhook(&app, &body).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = post_webhook(&app, &body).await;
    assert_eq!(res.status(), StatusCode::OK);
    let parsed = parse_body(res).await;
    assert_eq!(parsed["received"], true);

    let bookings = count(&app, "SELECT COUNT(*) as count FROM bookings").await;
    assert_eq!(bookings, 1);
}

#[tokio::test]
async fn test_sibling_offer_invalidation_across_requests() {
    let app = TestApp::new().await;

    // two customers, same zone and type: identical deterministic allocation,
    // so both hold an offer for the same physical first window
    let (_, first_primary, _) = create_request(&app, "first@example.com").await;
    let (request_2, second_primary, _) = create_request(&app, "second@example.com").await;

    let res = post_webhook(&app, &webhook_body("cs_race_1", &first_primary[0])).await;
    assert_eq!(res.status(), StatusCode::OK);

    // the loser's offer for that window is now inactive
    let second_offers = app.state.offer_repo.list_by_request(&request_2).await.unwrap();
    let losing = second_offers.iter().find(|o| &o.offer_token == &second_primary[0]).unwrap();
    assert!(!losing.is_active);

    // and its redemption is acknowledged but not processed
    let res = post_webhook(&app, &webhook_body("cs_race_2", &second_primary[0])).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["received"], true);
    assert_eq!(body["processed"], false);

    let bookings = count(&app, "SELECT COUNT(*) as count FROM bookings").await;
    assert_eq!(bookings, 1);

    let active_for_window = count(
        &app,
        "SELECT COUNT(*) as count FROM offers o WHERE o.is_active = 1 AND EXISTS (
            SELECT 1 FROM bookings b WHERE b.zone_code = o.zone_code
              AND b.appointment_type = o.appointment_type
              AND b.service_date = o.service_date
              AND b.slot_index = o.slot_index)",
    ).await;
    assert_eq!(active_for_window, 0);
}

#[tokio::test]
async fn test_expired_offer_token_never_reaches_store() {
    let app = TestApp::new().await;

    let expired = token::sign(
        &TokenPayload {
            v: TOKEN_VERSION,
            kind: KIND_OFFER.to_string(),
            request_id: "req-expired".to_string(),
            appointment_type: Some("standard".to_string()),
            zone: Some("B".to_string()),
            service_date: NaiveDate::from_ymd_opt(2026, 2, 9),
            slot_index: Some(1),
            exp: (Utc::now() - Duration::milliseconds(1)).timestamp_millis(),
        },
        OFFER_SECRET,
    );

    let res = post_webhook(&app, &webhook_body("cs_expired_1", &expired)).await;
    assert_eq!(res.status(), StatusCode::GONE);

    let bookings = count(&app, "SELECT COUNT(*) as count FROM bookings").await;
    assert_eq!(bookings, 0);
}

#[tokio::test]
async fn test_webhook_with_bad_signature_rejected() {
    let app = TestApp::new().await;
    let (_, primary, _) = create_request(&app, "jane@example.com").await;
    let body = webhook_body("cs_forged_1", &primary[0]);

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/webhooks/payment")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-payment-signature", "t=0,v1=deadbeef")
            .body(Body::from(body)).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let bookings = count(&app, "SELECT COUNT(*) as count FROM bookings").await;
    assert_eq!(bookings, 0);
}

#[tokio::test]
async fn test_unrelated_webhook_events_acknowledged() {
    let app = TestApp::new().await;
    let body = json!({
        "type": "charge.refunded",
        "data": { "object": { "id": "ch_1", "metadata": {} } }
    }).to_string();

    let res = post_webhook(&app, &body).await;
    assert_eq!(res.status(), StatusCode::OK);
    let parsed = parse_body(res).await;
    assert_eq!(parsed["received"], true);
}

#[tokio::test]
async fn test_tampered_offer_token_unauthorized() {
    let app = TestApp::new().await;
    let (_, primary, _) = create_request(&app, "jane@example.com").await;

    let (body, sig) = primary[0].split_once('.').unwrap();
    let flipped = if sig.starts_with('A') { "B" } else { "A" };
    let tampered = format!("{}.{}{}", body, flipped, &sig[1..]);

    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/offers/verify?token={}", tampered))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_select_blocked_by_technician_time_off() {
    let app = TestApp::new().await;
    let (request_id, primary, _) = create_request(&app, "jane@example.com").await;

    let offers = app.state.offer_repo.list_by_request(&request_id).await.unwrap();
    let offer = offers.iter().find(|o| &o.offer_token == &primary[0]).unwrap();

    sqlx::query("INSERT INTO technicians (id, name, zone_code) VALUES ('tech-1', 'Sam', 'B')")
        .execute(&app.pool).await.unwrap();
    sqlx::query("INSERT INTO technician_time_off (id, technician_id, start_date, end_date) VALUES ('off-1', 'tech-1', ?, ?)")
        .bind(offer.service_date).bind(offer.service_date)
        .execute(&app.pool).await.unwrap();

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/offers/select")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"token": primary[0]}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let request = app.state.request_repo.find_by_id(&request_id).await.unwrap().unwrap();
    assert_eq!(request.status, "sent");
}

#[tokio::test]
async fn test_select_allowed_when_zone_has_no_technician() {
    let app = TestApp::new().await;
    let (request_id, primary, _) = create_request(&app, "jane@example.com").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/offers/select")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"token": primary[0]}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let request = app.state.request_repo.find_by_id(&request_id).await.unwrap().unwrap();
    assert_eq!(request.status, "selected");
}

#[tokio::test]
async fn test_booked_slot_disappears_from_allocation() {
    let app = TestApp::new().await;
    let (_, primary, _) = create_request(&app, "first@example.com").await;

    let res = post_webhook(&app, &webhook_body("cs_shift_1", &primary[0])).await;
    assert_eq!(res.status(), StatusCode::OK);

    // a new customer is never offered the consumed window
    let (_, next_primary, _) = create_request(&app, "second@example.com").await;
    assert_ne!(next_primary[0], primary[0]);

    let booking = app.state.booking_repo.find_by_payment_session("cs_shift_1").await.unwrap().unwrap();
    let next_request_id = token::verify(&next_primary[0], OFFER_SECRET).unwrap().request_id;
    let offers = app.state.offer_repo.list_by_request(&next_request_id).await.unwrap();
    assert!(offers.iter().all(|o| {
        o.slot_code() != booking.slot_code || o.zone_code != booking.zone_code
    }));
}
