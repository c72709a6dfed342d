use axum::{extract::{Query, State}, response::IntoResponse, Json};
use chrono::{Duration, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

use crate::api::dtos::requests::SlotsQuery;
use crate::api::dtos::responses::{MoreSlots, SlotOption, SlotsResponse};
use crate::domain::models::request::AppointmentType;
use crate::domain::models::zone::ServiceZone;
use crate::domain::services::allocation::{allocate, AllocatedSlots};
use crate::domain::services::eligibility;
use crate::error::AppError;
use crate::state::AppState;

/// Preview of the windows a request for this zone and type would be
/// offered right now. The same pipeline runs again, against fresh booking
/// state, when offers are actually minted.
pub async fn get_available_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let appointment_type = AppointmentType::parse(&query.appointment_type)
        .ok_or(AppError::Validation("Unknown appointment type".into()))?;
    let zone = state.zones.get(&query.zone)
        .ok_or(AppError::NotFound("Unknown zone".into()))?;

    let allocated = compute_offer_slots(&state, zone, appointment_type).await?;

    Ok(Json(SlotsResponse {
        ok: true,
        primary: allocated.primary.iter().map(SlotOption::from).collect(),
        more: MoreSlots {
            options: allocated.more.iter().map(SlotOption::from).collect(),
            show_no_one_home_cta: appointment_type != AppointmentType::NoOneHome,
        },
    }))
}

/// Shared allocation pipeline: template slots for the zone and its
/// fallbacks, minus windows already consumed by bookings, ranked by the
/// five-pick rules. Zero candidates is a valid outcome, not an error.
pub async fn compute_offer_slots(
    state: &AppState,
    zone: &ServiceZone,
    appointment_type: AppointmentType,
) -> Result<AllocatedSlots, AppError> {
    let tz: Tz = state.config.business_timezone.parse().unwrap_or(chrono_tz::UTC);
    // offers start tomorrow; same-day dispatch is handled by phone
    let from = Utc::now().with_timezone(&tz).date_naive() + Duration::days(1);
    let horizon = state.config.booking_horizon_days;

    let candidates = eligibility::candidate_slots(&state.zones, zone, from, horizon);

    let to = from + Duration::days(horizon as i64);
    let bookings = state.booking_repo.list_active_in_range(from, to).await?;
    let open = eligibility::exclude_booked(candidates, &bookings);

    Ok(allocate(&open, zone, appointment_type))
}
