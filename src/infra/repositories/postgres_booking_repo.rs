use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::{map_unique_violation, AppError};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, request_id, selected_option_id, zone_code, appointment_type, service_date, slot_index, slot_code, start_time, end_time, customer_name, customer_email, status, payment_session_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.request_id).bind(&booking.selected_option_id)
            .bind(&booking.zone_code).bind(&booking.appointment_type).bind(booking.service_date)
            .bind(booking.slot_index).bind(&booking.slot_code).bind(booking.start_time).bind(booking.end_time)
            .bind(&booking.customer_name).bind(&booking.customer_email).bind(&booking.status)
            .bind(&booking.payment_session_id).bind(booking.created_at)
            .fetch_one(&self.pool).await
            .map_err(|e| map_unique_violation(e, "Slot already booked"))
    }

    async fn find_by_payment_session(&self, session_id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE payment_session_id = $1")
            .bind(session_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_slot(&self, zone_code: &str, appointment_type: &str, slot_code: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE zone_code = $1 AND appointment_type = $2 AND slot_code = $3 AND status != 'cancelled'"
        )
            .bind(zone_code).bind(appointment_type).bind(slot_code)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_active_in_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE service_date >= $1 AND service_date < $2 AND status != 'cancelled' ORDER BY service_date, slot_index"
        )
            .bind(from).bind(to).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_for_date(&self, date: NaiveDate) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE service_date = $1 AND status != 'cancelled'"
        )
            .bind(date).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
