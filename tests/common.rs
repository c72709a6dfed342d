use repair_booking_backend::{
    api::router::create_router,
    config::Config,
    domain::models::zone::ZoneDirectory,
    domain::ports::{
        CheckoutSession, EmailService, GeoPoint, GeocodingService, PaymentService, SmsService,
        ZoneLookupService,
    },
    domain::services::notification::NotificationService,
    domain::services::redemption::RedemptionService,
    error::AppError,
    infra::factory::load_templates,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo, sqlite_offer_repo::SqliteOfferRepo,
        sqlite_reminder_repo::SqliteReminderRepo, sqlite_request_repo::SqliteRequestRepo,
        sqlite_technician_repo::SqliteTechnicianRepo,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::Router;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

pub const OFFER_SECRET: &str = "test-offer-secret";
pub const WEBHOOK_SECRET: &str = "whsec_test";

/// Geocoder stub: "unknown" addresses have no match, "ocean" addresses
/// resolve to a point outside every zone polygon.
pub struct MockGeocoder;

#[async_trait]
impl GeocodingService for MockGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, AppError> {
        if address.contains("unknown") {
            return Ok(None);
        }
        let lat = if address.contains("ocean") { 0.0 } else { 52.52 };
        Ok(Some(GeoPoint {
            lat,
            lon: 13.40,
            formatted_address: format!("{} (geocoded)", address),
        }))
    }
}

pub struct MockZoneLookup;

#[async_trait]
impl ZoneLookupService for MockZoneLookup {
    async fn locate(&self, lat: f64, _lon: f64) -> Result<Option<String>, AppError> {
        if lat == 0.0 {
            return Ok(None);
        }
        Ok(Some("B".to_string()))
    }
}

pub struct MockEmailService;

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, _recipient: &str, _subject: &str, _html_body: &str) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct MockSmsService;

#[async_trait]
impl SmsService for MockSmsService {
    async fn send(&self, _phone: &str, _body: &str) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct MockPaymentService;

#[async_trait]
impl PaymentService for MockPaymentService {
    async fn create_checkout_session(
        &self,
        _offer_token: &str,
        _amount_cents: i64,
        _description: &str,
    ) -> Result<CheckoutSession, AppError> {
        Ok(CheckoutSession {
            id: "cs_mock_1".to_string(),
            url: "https://pay.example.com/cs_mock_1".to_string(),
        })
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            business_timezone: "UTC".to_string(),
            booking_horizon_days: 21,
            offer_token_secret: OFFER_SECRET.to_string(),
            offer_ttl_minutes: 60,
            geocoder_url: "http://localhost".to_string(),
            geocoder_api_key: String::new(),
            zone_lookup_url: "http://localhost".to_string(),
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            sms_service_url: "http://localhost".to_string(),
            sms_service_token: "token".to_string(),
            payment_api_url: "http://localhost".to_string(),
            payment_secret_key: "sk_test".to_string(),
            payment_webhook_secret: WEBHOOK_SECRET.to_string(),
            booking_fee_cents: 4900,
            frontend_url: "http://localhost:5173".to_string(),
        };

        let request_repo = Arc::new(SqliteRequestRepo::new(pool.clone()));
        let offer_repo = Arc::new(SqliteOfferRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let redemption_service = Arc::new(RedemptionService::new(
            offer_repo.clone(),
            booking_repo.clone(),
            request_repo.clone(),
        ));

        let notification_service = Arc::new(NotificationService::new(
            Arc::new(MockEmailService),
            Arc::new(MockSmsService),
            Arc::new(load_templates()),
            config.frontend_url.clone(),
        ));

        let state = Arc::new(AppState {
            config,
            zones: ZoneDirectory::standard(),
            request_repo,
            offer_repo,
            booking_repo,
            technician_repo: Arc::new(SqliteTechnicianRepo::new(pool.clone())),
            reminder_repo: Arc::new(SqliteReminderRepo::new(pool.clone())),
            geocoder: Arc::new(MockGeocoder),
            zone_lookup: Arc::new(MockZoneLookup),
            payment_service: Arc::new(MockPaymentService),
            notification_service,
            redemption_service,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

/// Provider-style signature header over the raw webhook body.
#[allow(dead_code)]
pub fn sign_webhook_body(body: &str) -> String {
    let t = chrono::Utc::now().timestamp();
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(format!("{}.{}", t, body).as_bytes());
    format!("t={},v1={}", t, hex::encode(mac.finalize().into_bytes()))
}
