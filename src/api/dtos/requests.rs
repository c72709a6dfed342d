use serde::Deserialize;

#[derive(Deserialize)]
pub struct ResolveZoneQuery {
    pub address: String,
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub zone: String,
    #[serde(rename = "type")]
    pub appointment_type: String,
}

#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
    pub appointment_type: String,
    pub contact_method: Option<String>,
}

#[derive(Deserialize)]
pub struct OfferTokenQuery {
    pub token: String,
}

#[derive(Deserialize)]
pub struct OfferTokenBody {
    pub token: String,
}

#[derive(Deserialize)]
pub struct PaymentWebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: PaymentEventData,
}

#[derive(Deserialize)]
pub struct PaymentEventData {
    pub object: PaymentSessionObject,
}

#[derive(Deserialize)]
pub struct PaymentSessionObject {
    pub id: String,
    #[serde(default)]
    pub metadata: PaymentSessionMetadata,
}

#[derive(Deserialize, Default)]
pub struct PaymentSessionMetadata {
    pub offer_token: Option<String>,
}
