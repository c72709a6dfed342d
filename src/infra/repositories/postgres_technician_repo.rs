use crate::domain::{models::technician::Technician, ports::TechnicianRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};

pub struct PostgresTechnicianRepo {
    pool: PgPool,
}

impl PostgresTechnicianRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TechnicianRepository for PostgresTechnicianRepo {
    async fn find_by_zone(&self, zone_code: &str) -> Result<Option<Technician>, AppError> {
        sqlx::query_as::<_, Technician>("SELECT * FROM technicians WHERE zone_code = $1")
            .bind(zone_code).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn has_time_off_on(&self, technician_id: &str, date: NaiveDate) -> Result<bool, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM technician_time_off WHERE technician_id = $1 AND start_date <= $2 AND end_date >= $3"
        )
            .bind(technician_id).bind(date).bind(date)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count") > 0)
    }
}
