use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::dtos::requests::PaymentWebhookEvent;
use crate::error::AppError;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Accepted clock skew between the provider's signing timestamp and us.
const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Signed payment-provider callback. `checkout.session.completed` runs the
/// redemption gate; everything else is acknowledged and dropped. A lost
/// slot race is acknowledged too — the provider must not retry it.
pub async fn payment_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let signature = headers
        .get("x-payment-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    if !validate_webhook_signature(
        &state.config.payment_webhook_secret,
        signature,
        &body,
        Utc::now().timestamp(),
    ) {
        warn!("payment webhook rejected: invalid signature");
        return Err(AppError::Unauthorized);
    }

    let event: PaymentWebhookEvent = serde_json::from_str(&body)
        .map_err(|_| AppError::Validation("Malformed webhook payload".into()))?;

    if event.event_type != "checkout.session.completed" {
        info!("payment webhook: ignoring event type {}", event.event_type);
        return Ok(Json(json!({ "received": true })));
    }

    let session = event.data.object;
    let offer_token = session.metadata.offer_token
        .ok_or(AppError::Validation("Webhook session carries no offer token".into()))?;

    let booking = match state
        .redemption_service
        .redeem(&offer_token, &state.config.offer_token_secret, Some(&session.id))
        .await
    {
        Ok(booking) => booking,
        // The slot went to someone else between checkout and capture.
        // Acknowledge so the provider stops retrying; refund handling is a
        // separate operational flow keyed on the session id.
        Err(AppError::Conflict(msg)) => {
            error!(session_id = %session.id, "redemption lost the slot: {}", msg);
            return Ok(Json(json!({ "received": true, "processed": false, "error": msg })));
        }
        Err(e) => return Err(e),
    };

    let delivery = state.notification_service.send_confirmation(&booking).await;

    Ok(Json(json!({
        "received": true,
        "booking_id": booking.id,
        "delivery": delivery,
    })))
}

/// Header format: `t=<unix seconds>,v1=<hex hmac-sha256 over "t.body">`.
fn validate_webhook_signature(secret: &str, header: &str, body: &str, now: i64) -> bool {
    let mut timestamp: Option<i64> = None;
    let mut provided: Option<Vec<u8>> = None;

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => provided = hex::decode(value).ok(),
            _ => {}
        }
    }

    let (Some(t), Some(provided)) = (timestamp, provided) else {
        return false;
    };

    if (now - t).abs() > SIGNATURE_TOLERANCE_SECS {
        return false;
    }

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(format!("{}.{}", t, body).as_bytes());
    mac.verify_slice(&provided).is_ok()
}
