use std::sync::Arc;
use crate::config::Config;
use crate::domain::models::zone::ZoneDirectory;
use crate::domain::ports::{
    BookingRepository, GeocodingService, OfferRepository, PaymentService,
    ReminderLogRepository, RequestRepository, TechnicianRepository, ZoneLookupService,
};
use crate::domain::services::notification::NotificationService;
use crate::domain::services::redemption::RedemptionService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub zones: ZoneDirectory,
    pub request_repo: Arc<dyn RequestRepository>,
    pub offer_repo: Arc<dyn OfferRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub technician_repo: Arc<dyn TechnicianRepository>,
    pub reminder_repo: Arc<dyn ReminderLogRepository>,
    pub geocoder: Arc<dyn GeocodingService>,
    pub zone_lookup: Arc<dyn ZoneLookupService>,
    pub payment_service: Arc<dyn PaymentService>,
    pub notification_service: Arc<NotificationService>,
    pub redemption_service: Arc<RedemptionService>,
}
