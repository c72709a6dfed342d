mod common;

use chrono::{Duration, Utc};
use common::TestApp;
use repair_booking_backend::background::dispatch_due_reminders;
use repair_booking_backend::domain::models::booking::Booking;
use repair_booking_backend::domain::models::offer::Offer;
use repair_booking_backend::domain::models::request::{AppointmentType, BookingRequest, NewRequestParams};
use repair_booking_backend::domain::models::slot::Slot;
use sqlx::Row;

/// Seeds a confirmed booking whose window starts `from_now` from now
/// (test timezone is UTC, so local wall-clock == UTC).
async fn seed_booking(app: &TestApp, from_now: Duration) -> Booking {
    let start = Utc::now() + from_now;

    let request = BookingRequest::new(NewRequestParams {
        name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        phone: None,
        address: "Main St 1".into(),
        formatted_address: None,
        zone_code: "B".into(),
        appointment_type: AppointmentType::Standard,
        contact_method: "email".into(),
    });
    let request = app.state.request_repo.create(&request).await.unwrap();

    let slot = Slot::from_template("B", start.date_naive(), 1);
    let offer = Offer::new(&request.id, "primary", "standard", &slot, format!("tok-{}", request.id));
    app.state.offer_repo.create_batch(&[offer.clone()]).await.unwrap();

    let mut booking = Booking::from_offer(&offer, &request, None);
    booking.service_date = start.date_naive();
    booking.start_time = start.time();
    app.state.booking_repo.create(&booking).await.unwrap()
}

async fn reminder_rows(app: &TestApp, booking_id: &str) -> Vec<(String, String)> {
    sqlx::query("SELECT reminder_type, status FROM reminder_logs WHERE booking_id = ? ORDER BY reminder_type")
        .bind(booking_id)
        .fetch_all(&app.pool)
        .await
        .unwrap()
        .iter()
        .map(|r| (r.get::<String, _>("reminder_type"), r.get::<String, _>("status")))
        .collect()
}

#[tokio::test]
async fn test_day_before_reminder_sent_once() {
    let app = TestApp::new().await;
    let booking = seed_booking(&app, Duration::hours(23)).await;

    dispatch_due_reminders(&app.state).await.unwrap();
    dispatch_due_reminders(&app.state).await.unwrap();

    let rows = reminder_rows(&app, &booking.id).await;
    assert_eq!(rows, vec![("REMINDER_24H".to_string(), "SENT".to_string())]);
}

#[tokio::test]
async fn test_last_hour_reminder_type() {
    let app = TestApp::new().await;
    // a booking starting within the hour gets the short-notice reminder
    let booking = seed_booking(&app, Duration::minutes(30)).await;

    dispatch_due_reminders(&app.state).await.unwrap();

    let rows = reminder_rows(&app, &booking.id).await;
    assert_eq!(rows, vec![("REMINDER_1H".to_string(), "SENT".to_string())]);
}

#[tokio::test]
async fn test_far_future_booking_gets_no_reminder() {
    let app = TestApp::new().await;
    let booking = seed_booking(&app, Duration::days(6)).await;

    dispatch_due_reminders(&app.state).await.unwrap();

    let rows = reminder_rows(&app, &booking.id).await;
    assert!(rows.is_empty());
}
