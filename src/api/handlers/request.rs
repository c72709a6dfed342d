use axum::{extract::State, response::IntoResponse, Json};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::CreateAppointmentRequest;
use crate::api::dtos::responses::{CreateAppointmentResponse, MoreOffers, OfferOption};
use crate::api::handlers::slots::compute_offer_slots;
use crate::domain::models::offer::Offer;
use crate::domain::models::request::{AppointmentType, BookingRequest, NewRequestParams};
use crate::domain::models::slot::Slot;
use crate::domain::services::token::{self, TokenPayload, KIND_OFFER, TOKEN_VERSION};
use crate::error::AppError;
use crate::state::AppState;

/// The main public entry point: resolve the address to a zone, create the
/// request, allocate candidate windows, mint one signed offer per window,
/// persist the batch, then deliver the links best-effort.
pub async fn create_request(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.trim();
    let email = payload.email.trim();
    let address = payload.address.trim();

    if name.is_empty() {
        return Err(AppError::Validation("name must not be empty".into()));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("a valid email address is required".into()));
    }
    if address.is_empty() {
        return Err(AppError::Validation("address must not be empty".into()));
    }

    let appointment_type = AppointmentType::parse(&payload.appointment_type)
        .ok_or(AppError::Validation("Unknown appointment type".into()))?;

    let contact_method = payload.contact_method.as_deref().unwrap_or("email");
    if contact_method != "email" && contact_method != "sms" {
        return Err(AppError::Validation("contact_method must be 'email' or 'sms'".into()));
    }
    if contact_method == "sms" && payload.phone.as_deref().map_or(true, |p| p.trim().is_empty()) {
        return Err(AppError::Validation("a phone number is required for SMS delivery".into()));
    }

    let point = state.geocoder.geocode(address).await?
        .ok_or(AppError::NotFound("No match found for that address".into()))?;
    let zone_code = state.zone_lookup.locate(point.lat, point.lon).await?
        .ok_or(AppError::NotFound("Address is outside our service area".into()))?;
    let zone = state.zones.get(&zone_code)
        .ok_or(AppError::NotFound("Address is outside our service area".into()))?
        .clone();

    let request = BookingRequest::new(NewRequestParams {
        name: name.to_string(),
        email: email.to_string(),
        phone: payload.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
        address: address.to_string(),
        formatted_address: Some(point.formatted_address).filter(|a| !a.is_empty()),
        zone_code: zone.code.clone(),
        appointment_type,
        contact_method: contact_method.to_string(),
    });
    let request = state.request_repo.create(&request).await?;

    info!("create_request: Request {} created for zone {}", request.id, zone.code);

    let allocated = compute_offer_slots(&state, &zone, appointment_type).await?;

    let exp = (Utc::now() + Duration::minutes(state.config.offer_ttl_minutes)).timestamp_millis();
    let mut primary_offers = Vec::new();
    let mut more_offers = Vec::new();

    for slot in &allocated.primary {
        primary_offers.push(mint_offer(&state, &request, "primary", appointment_type, slot, exp));
    }
    for slot in &allocated.more {
        more_offers.push(mint_offer(&state, &request, "more", appointment_type, slot, exp));
    }

    let all_offers: Vec<Offer> = primary_offers.iter().chain(more_offers.iter()).cloned().collect();

    if all_offers.is_empty() {
        // soft outcome: the request stays open, dispatch follows up manually
        info!("create_request: No eligible windows for request {}", request.id);
        let request_token = token::sign(
            &TokenPayload::request(&request.id, exp),
            &state.config.offer_token_secret,
        );
        return Ok(Json(CreateAppointmentResponse {
            ok: true,
            request_id: request.id,
            token: request_token,
            primary: Vec::new(),
            more: MoreOffers {
                options: Vec::new(),
                show_no_one_home_cta: appointment_type != AppointmentType::NoOneHome,
            },
            message: Some("No appointment options are currently available".to_string()),
            delivery: None,
        }));
    }

    state.offer_repo.create_batch(&all_offers).await?;
    info!("create_request: Persisted {} offers for request {}", all_offers.len(), request.id);

    let delivery = state
        .notification_service
        .send_offer_list(&request, &primary_offers, &more_offers)
        .await;

    let request_token = token::sign(
        &TokenPayload::request(&request.id, exp),
        &state.config.offer_token_secret,
    );

    Ok(Json(CreateAppointmentResponse {
        ok: true,
        request_id: request.id,
        token: request_token,
        primary: primary_offers.iter().map(OfferOption::from).collect(),
        more: MoreOffers {
            options: more_offers.iter().map(OfferOption::from).collect(),
            show_no_one_home_cta: appointment_type != AppointmentType::NoOneHome,
        },
        message: None,
        delivery: Some(delivery),
    }))
}

fn mint_offer(
    state: &AppState,
    request: &BookingRequest,
    group: &str,
    appointment_type: AppointmentType,
    slot: &Slot,
    exp: i64,
) -> Offer {
    let payload = TokenPayload {
        v: TOKEN_VERSION,
        kind: KIND_OFFER.to_string(),
        request_id: request.id.clone(),
        appointment_type: Some(appointment_type.as_str().to_string()),
        zone: Some(slot.zone_code.clone()),
        service_date: Some(slot.service_date),
        slot_index: Some(slot.slot_index),
        exp,
    };
    let offer_token = token::sign(&payload, &state.config.offer_token_secret);
    Offer::new(&request.id, group, appointment_type.as_str(), slot, offer_token)
}
