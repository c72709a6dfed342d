use axum::{extract::{Query, State}, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::requests::{OfferTokenBody, OfferTokenQuery};
use crate::api::dtos::responses::OfferOption;
use crate::domain::models::offer::Offer;
use crate::domain::services::token::{self, KIND_OFFER};
use crate::error::AppError;
use crate::state::AppState;

/// Pre-checkout validation: the token must verify, the offer row must
/// still be active, and the physical window must still be free.
pub async fn verify_offer(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OfferTokenQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (offer, payload) = load_live_offer(&state, &query.token).await?;

    Ok(Json(json!({
        "ok": true,
        "offer": OfferOption::from(&offer),
        "payload": payload,
    })))
}

/// Marks the owning request as `selected`. The technician time-off check
/// is best-effort: a zone without a mapped technician is allowed through.
pub async fn select_offer(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OfferTokenBody>,
) -> Result<impl IntoResponse, AppError> {
    let (offer, _) = load_live_offer(&state, &body.token).await?;

    match state.technician_repo.find_by_zone(&offer.zone_code).await? {
        Some(tech) => {
            if state.technician_repo.has_time_off_on(&tech.id, offer.service_date).await? {
                return Err(AppError::Conflict(
                    "The technician for this area is unavailable on that date".into(),
                ));
            }
        }
        None => {
            warn!("No technician mapped for zone {}, skipping time-off check", offer.zone_code);
        }
    }

    state.request_repo.mark_selected(&offer.request_id).await?;
    info!("Offer {} selected for request {}", offer.id, offer.request_id);

    Ok(Json(json!({
        "ok": true,
        "request_id": offer.request_id,
        "selected": OfferOption::from(&offer),
    })))
}

/// Token + row + slot-availability gate shared by the verify, select and
/// checkout paths. Conflicts mean the slot was taken, not a system fault.
pub async fn load_live_offer(
    state: &AppState,
    offer_token: &str,
) -> Result<(Offer, token::TokenPayload), AppError> {
    let payload = token::verify(offer_token, &state.config.offer_token_secret)?;
    if payload.kind != KIND_OFFER {
        return Err(AppError::Validation("Not an offer token".into()));
    }

    let offer = state.offer_repo.find_by_token(offer_token).await?
        .ok_or(AppError::NotFound("Offer not found".into()))?;

    if !offer.is_active {
        return Err(AppError::Conflict("slot_taken".into()));
    }

    if state
        .booking_repo
        .find_by_slot(&offer.zone_code, &offer.appointment_type, &offer.slot_code())
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("slot_taken".into()));
    }

    Ok((offer, payload))
}
