use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::OfferTokenBody;
use crate::api::handlers::offer::load_live_offer;
use crate::error::AppError;
use crate::state::AppState;

/// Re-validates the offer, then hands off to the payment provider. The
/// booking itself is only created by the payment webhook.
pub async fn create_checkout_session(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OfferTokenBody>,
) -> Result<impl IntoResponse, AppError> {
    let (offer, _) = load_live_offer(&state, &body.token).await?;

    let description = format!(
        "Repair appointment {} {} - {}",
        offer.service_date.format("%Y-%m-%d"),
        offer.start_time.format("%H:%M"),
        offer.end_time.format("%H:%M"),
    );

    let session = state
        .payment_service
        .create_checkout_session(&offer.offer_token, state.config.booking_fee_cents, &description)
        .await?;

    info!("Checkout session {} created for offer {}", session.id, offer.id);

    Ok(Json(json!({
        "ok": true,
        "url": session.url,
    })))
}
