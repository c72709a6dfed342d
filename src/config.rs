use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub business_timezone: String,
    pub booking_horizon_days: u32,
    pub offer_token_secret: String,
    pub offer_ttl_minutes: i64,
    pub geocoder_url: String,
    pub geocoder_api_key: String,
    pub zone_lookup_url: String,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub sms_service_url: String,
    pub sms_service_token: String,
    pub payment_api_url: String,
    pub payment_secret_key: String,
    pub payment_webhook_secret: String,
    pub booking_fee_cents: i64,
    pub frontend_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            business_timezone: env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| "Europe/Berlin".to_string()),
            booking_horizon_days: env::var("BOOKING_HORIZON_DAYS").unwrap_or_else(|_| "21".to_string()).parse().expect("BOOKING_HORIZON_DAYS must be a number"),
            offer_token_secret: env::var("OFFER_TOKEN_SECRET").expect("OFFER_TOKEN_SECRET must be set"),
            offer_ttl_minutes: env::var("OFFER_TTL_MINUTES").unwrap_or_else(|_| "4320".to_string()).parse().expect("OFFER_TTL_MINUTES must be a number"),
            geocoder_url: env::var("GEOCODER_URL").unwrap_or_else(|_| "https://geocode.example.com/v1/search".to_string()),
            geocoder_api_key: env::var("GEOCODER_API_KEY").unwrap_or_default(),
            zone_lookup_url: env::var("ZONE_LOOKUP_URL").unwrap_or_else(|_| "https://zones.example.com/v1/locate".to_string()),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            sms_service_url: env::var("SMS_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8001/api/v1/messages".to_string()),
            sms_service_token: env::var("SMS_SERVICE_TOKEN").unwrap_or_default(),
            payment_api_url: env::var("PAYMENT_API_URL").unwrap_or_else(|_| "https://pay.example.com/v1".to_string()),
            payment_secret_key: env::var("PAYMENT_SECRET_KEY").unwrap_or_default(),
            payment_webhook_secret: env::var("PAYMENT_WEBHOOK_SECRET").expect("PAYMENT_WEBHOOK_SECRET must be set"),
            booking_fee_cents: env::var("BOOKING_FEE_CENTS").unwrap_or_else(|_| "4900".to_string()).parse().expect("BOOKING_FEE_CENTS must be a number"),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string()),
        }
    }
}
