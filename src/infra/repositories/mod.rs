pub mod postgres_booking_repo;
pub mod postgres_offer_repo;
pub mod postgres_reminder_repo;
pub mod postgres_request_repo;
pub mod postgres_technician_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_offer_repo;
pub mod sqlite_reminder_repo;
pub mod sqlite_request_repo;
pub mod sqlite_technician_repo;
