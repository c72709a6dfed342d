use crate::domain::{models::request::BookingRequest, ports::RequestRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteRequestRepo {
    pool: SqlitePool,
}

impl SqliteRequestRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestRepository for SqliteRequestRepo {
    async fn create(&self, request: &BookingRequest) -> Result<BookingRequest, AppError> {
        sqlx::query_as::<_, BookingRequest>(
            "INSERT INTO booking_requests (id, customer_name, customer_email, customer_phone, address, formatted_address, zone_code, appointment_type, contact_method, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&request.id).bind(&request.customer_name).bind(&request.customer_email).bind(&request.customer_phone)
            .bind(&request.address).bind(&request.formatted_address).bind(&request.zone_code)
            .bind(&request.appointment_type).bind(&request.contact_method).bind(&request.status).bind(request.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BookingRequest>, AppError> {
        sqlx::query_as::<_, BookingRequest>("SELECT * FROM booking_requests WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn mark_selected(&self, id: &str) -> Result<(), AppError> {
        // conditional update keeps the sent -> selected -> booked chain monotonic
        sqlx::query("UPDATE booking_requests SET status = 'selected' WHERE id = ? AND status = 'sent'")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn mark_booked(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE booking_requests SET status = 'booked' WHERE id = ? AND status IN ('sent', 'selected')")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
}
