use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::domain::models::offer::Offer;
use crate::domain::models::slot::Slot;
use crate::domain::services::notification::DeliveryReport;

#[derive(Serialize)]
pub struct SlotOption {
    pub zone_code: String,
    pub service_date: NaiveDate,
    pub slot_index: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub daypart: String,
}

impl From<&Slot> for SlotOption {
    fn from(slot: &Slot) -> Self {
        Self {
            zone_code: slot.zone_code.clone(),
            service_date: slot.service_date,
            slot_index: slot.slot_index,
            start_time: slot.start_time,
            end_time: slot.end_time,
            daypart: slot.daypart().as_str().to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct OfferOption {
    pub token: String,
    pub group: String,
    pub zone_code: String,
    pub service_date: NaiveDate,
    pub slot_index: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<&Offer> for OfferOption {
    fn from(offer: &Offer) -> Self {
        Self {
            token: offer.offer_token.clone(),
            group: offer.offer_group.clone(),
            zone_code: offer.zone_code.clone(),
            service_date: offer.service_date,
            slot_index: offer.slot_index,
            start_time: offer.start_time,
            end_time: offer.end_time,
        }
    }
}

#[derive(Serialize)]
pub struct MoreSlots {
    pub options: Vec<SlotOption>,
    pub show_no_one_home_cta: bool,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub ok: bool,
    pub primary: Vec<SlotOption>,
    pub more: MoreSlots,
}

#[derive(Serialize)]
pub struct MoreOffers {
    pub options: Vec<OfferOption>,
    pub show_no_one_home_cta: bool,
}

#[derive(Serialize)]
pub struct CreateAppointmentResponse {
    pub ok: bool,
    pub request_id: String,
    pub token: String,
    pub primary: Vec<OfferOption>,
    pub more: MoreOffers,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryReport>,
}
