use crate::domain::models::{
    booking::Booking, offer::Offer, request::BookingRequest, technician::Technician,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn create(&self, request: &BookingRequest) -> Result<BookingRequest, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<BookingRequest>, AppError>;
    /// `sent -> selected`. A request that already advanced further is left alone.
    async fn mark_selected(&self, id: &str) -> Result<(), AppError>;
    /// `sent|selected -> booked`. Never regresses.
    async fn mark_booked(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait OfferRepository: Send + Sync {
    async fn create_batch(&self, offers: &[Offer]) -> Result<(), AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Offer>, AppError>;
    async fn list_by_request(&self, request_id: &str) -> Result<Vec<Offer>, AppError>;
    /// Deactivates every offer for the physical window, across all requests
    /// and offer groups. Returns the number of rows flipped.
    async fn deactivate_siblings(
        &self,
        zone_code: &str,
        appointment_type: &str,
        service_date: NaiveDate,
        slot_index: i32,
    ) -> Result<u64, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserting a booking for an already-taken window must surface as
    /// `AppError::Conflict`, not as a generic database error.
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_payment_session(&self, session_id: &str) -> Result<Option<Booking>, AppError>;
    async fn find_by_slot(
        &self,
        zone_code: &str,
        appointment_type: &str,
        slot_code: &str,
    ) -> Result<Option<Booking>, AppError>;
    async fn list_active_in_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Booking>, AppError>;
    async fn list_for_date(&self, date: NaiveDate) -> Result<Vec<Booking>, AppError>;
}

#[async_trait]
pub trait TechnicianRepository: Send + Sync {
    async fn find_by_zone(&self, zone_code: &str) -> Result<Option<Technician>, AppError>;
    async fn has_time_off_on(&self, technician_id: &str, date: NaiveDate) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ReminderLogRepository: Send + Sync {
    /// Attempted-insert-first claim. Returns false when the reminder was
    /// already claimed for this booking and type.
    async fn try_claim(&self, booking_id: &str, reminder_type: &str) -> Result<bool, AppError>;
}

#[derive(Debug, Clone)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub formatted_address: String,
}

#[async_trait]
pub trait GeocodingService: Send + Sync {
    /// First geocoder match for the free-text address, None when the
    /// provider reports no result.
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, AppError>;
}

#[async_trait]
pub trait ZoneLookupService: Send + Sync {
    /// Point-in-polygon lookup; None when no zone polygon contains the point.
    async fn locate(&self, lat: f64, lon: f64) -> Result<Option<String>, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait SmsService: Send + Sync {
    async fn send(&self, phone: &str, body: &str) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[async_trait]
pub trait PaymentService: Send + Sync {
    async fn create_checkout_session(
        &self,
        offer_token: &str,
        amount_cents: i64,
        description: &str,
    ) -> Result<CheckoutSession, AppError>;
}
