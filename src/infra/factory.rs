use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::domain::models::zone::ZoneDirectory;
use crate::domain::services::notification::NotificationService;
use crate::domain::services::redemption::RedemptionService;
use crate::state::AppState;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::geo::http_geocoder::HttpGeocoder;
use crate::infra::geo::http_zone_lookup::HttpZoneLookup;
use crate::infra::payments::http_payment_service::HttpPaymentService;
use crate::infra::sms::http_sms_service::HttpSmsService;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_offer_repo::PostgresOfferRepo,
    postgres_reminder_repo::PostgresReminderRepo, postgres_request_repo::PostgresRequestRepo,
    postgres_technician_repo::PostgresTechnicianRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_offer_repo::SqliteOfferRepo,
    sqlite_reminder_repo::SqliteReminderRepo, sqlite_request_repo::SqliteRequestRepo,
    sqlite_technician_repo::SqliteTechnicianRepo,
};

pub fn load_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template("offers.html", include_str!("../../templates/offers.html"))
        .expect("Failed to load offers template");
    tera.add_raw_template("confirmation.html", include_str!("../../templates/confirmation.html"))
        .expect("Failed to load confirmation template");
    tera.add_raw_template("reminder.html", include_str!("../../templates/reminder.html"))
        .expect("Failed to load reminder template");
    tera
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let geocoder = Arc::new(HttpGeocoder::new(
        config.geocoder_url.clone(),
        config.geocoder_api_key.clone(),
    ));
    let zone_lookup = Arc::new(HttpZoneLookup::new(config.zone_lookup_url.clone()));
    let payment_service = Arc::new(HttpPaymentService::new(
        config.payment_api_url.clone(),
        config.payment_secret_key.clone(),
        config.frontend_url.clone(),
    ));

    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));
    let sms_service = Arc::new(HttpSmsService::new(
        config.sms_service_url.clone(),
        config.sms_service_token.clone(),
    ));

    let templates = Arc::new(load_templates());
    let notification_service = Arc::new(NotificationService::new(
        email_service,
        sms_service,
        templates,
        config.frontend_url.clone(),
    ));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let request_repo = Arc::new(PostgresRequestRepo::new(pool.clone()));
        let offer_repo = Arc::new(PostgresOfferRepo::new(pool.clone()));
        let booking_repo = Arc::new(PostgresBookingRepo::new(pool.clone()));
        let redemption_service = Arc::new(RedemptionService::new(
            offer_repo.clone(),
            booking_repo.clone(),
            request_repo.clone(),
        ));

        AppState {
            config: config.clone(),
            zones: ZoneDirectory::standard(),
            request_repo,
            offer_repo,
            booking_repo,
            technician_repo: Arc::new(PostgresTechnicianRepo::new(pool.clone())),
            reminder_repo: Arc::new(PostgresReminderRepo::new(pool.clone())),
            geocoder,
            zone_lookup,
            payment_service,
            notification_service,
            redemption_service,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let request_repo = Arc::new(SqliteRequestRepo::new(pool.clone()));
        let offer_repo = Arc::new(SqliteOfferRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let redemption_service = Arc::new(RedemptionService::new(
            offer_repo.clone(),
            booking_repo.clone(),
            request_repo.clone(),
        ));

        AppState {
            config: config.clone(),
            zones: ZoneDirectory::standard(),
            request_repo,
            offer_repo,
            booking_repo,
            technician_repo: Arc::new(SqliteTechnicianRepo::new(pool.clone())),
            reminder_repo: Arc::new(SqliteReminderRepo::new(pool.clone())),
            geocoder,
            zone_lookup,
            payment_service,
            notification_service,
            redemption_service,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
