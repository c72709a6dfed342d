use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentType {
    Standard,
    FullService,
    NoOneHome,
    PartsIn,
}

impl AppointmentType {
    /// `parts` is accepted as a legacy alias for `parts_in`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "standard" => Some(Self::Standard),
            "full_service" => Some(Self::FullService),
            "no_one_home" => Some(Self::NoOneHome),
            "parts_in" | "parts" => Some(Self::PartsIn),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::FullService => "full_service",
            Self::NoOneHome => "no_one_home",
            Self::PartsIn => "parts_in",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BookingRequest {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub address: String,
    pub formatted_address: Option<String>,
    pub zone_code: String,
    pub appointment_type: String,
    pub contact_method: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewRequestParams {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
    pub formatted_address: Option<String>,
    pub zone_code: String,
    pub appointment_type: AppointmentType,
    pub contact_method: String,
}

impl BookingRequest {
    pub fn new(params: NewRequestParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_name: params.name,
            customer_email: params.email,
            customer_phone: params.phone,
            address: params.address,
            formatted_address: params.formatted_address,
            zone_code: params.zone_code,
            appointment_type: params.appointment_type.as_str().to_string(),
            contact_method: params.contact_method,
            status: "sent".to_string(),
            created_at: Utc::now(),
        }
    }
}
