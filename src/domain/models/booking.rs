use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::models::offer::Offer;
use crate::domain::models::request::BookingRequest;

/// The committed appointment. The store-level unique constraint on
/// `(zone_code, appointment_type, slot_code)` is the only real guarantee
/// that a physical window is booked at most once.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub request_id: String,
    pub selected_option_id: String,
    pub zone_code: String,
    pub appointment_type: String,
    pub service_date: NaiveDate,
    pub slot_index: i32,
    pub slot_code: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub customer_name: String,
    pub customer_email: String,
    pub status: String,
    pub payment_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn from_offer(offer: &Offer, request: &BookingRequest, payment_session_id: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            request_id: offer.request_id.clone(),
            selected_option_id: offer.id.clone(),
            zone_code: offer.zone_code.clone(),
            appointment_type: offer.appointment_type.clone(),
            service_date: offer.service_date,
            slot_index: offer.slot_index,
            slot_code: offer.slot_code(),
            start_time: offer.start_time,
            end_time: offer.end_time,
            customer_name: request.customer_name.clone(),
            customer_email: request.customer_email.clone(),
            status: "confirmed".to_string(),
            payment_session_id: payment_session_id.map(|s| s.to_string()),
            created_at: Utc::now(),
        }
    }
}
