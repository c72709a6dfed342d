use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::models::slot::{slot_code, Slot};

/// A signed proposal binding one slot to one booking request. Offers are
/// never deleted; redemption of any sibling for the same physical window
/// flips `is_active` to false across all requests.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Offer {
    pub id: String,
    pub request_id: String,
    pub offer_group: String,
    pub zone_code: String,
    pub appointment_type: String,
    pub service_date: NaiveDate,
    pub slot_index: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub offer_token: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Offer {
    pub fn new(request_id: &str, offer_group: &str, appointment_type: &str, slot: &Slot, offer_token: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            request_id: request_id.to_string(),
            offer_group: offer_group.to_string(),
            zone_code: slot.zone_code.clone(),
            appointment_type: appointment_type.to_string(),
            service_date: slot.service_date,
            slot_index: slot.slot_index,
            start_time: slot.start_time,
            end_time: slot.end_time,
            offer_token,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn slot_code(&self) -> String {
        slot_code(self.service_date, self.slot_index)
    }
}
