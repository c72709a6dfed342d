use axum::{extract::{Query, State}, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::ResolveZoneQuery;
use crate::error::AppError;
use crate::state::AppState;

/// Free-text address to service zone: geocode, then point-in-polygon.
/// Every call re-geocodes; there is no cache at this request volume.
pub async fn resolve_zone(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResolveZoneQuery>,
) -> Result<impl IntoResponse, AppError> {
    let address = query.address.trim();
    if address.is_empty() {
        return Err(AppError::Validation("address must not be empty".into()));
    }

    let point = state.geocoder.geocode(address).await?
        .ok_or(AppError::NotFound("No match found for that address".into()))?;

    let zone_code = state.zone_lookup.locate(point.lat, point.lon).await?
        .ok_or(AppError::NotFound("Address is outside our service area".into()))?;

    let zone = state.zones.get(&zone_code)
        .ok_or(AppError::NotFound("Address is outside our service area".into()))?;

    info!("Resolved address to zone {} ({})", zone.code, zone.name);

    Ok(Json(json!({
        "ok": true,
        "zone_code": zone.code,
        "zone_name": zone.name,
        "lat": point.lat,
        "lon": point.lon,
        "formatted_address": point.formatted_address,
    })))
}
