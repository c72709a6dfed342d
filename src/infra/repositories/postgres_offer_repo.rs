use crate::domain::{models::offer::Offer, ports::OfferRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct PostgresOfferRepo {
    pool: PgPool,
}

impl PostgresOfferRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfferRepository for PostgresOfferRepo {
    async fn create_batch(&self, offers: &[Offer]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        for offer in offers {
            sqlx::query(
                "INSERT INTO offers (id, request_id, offer_group, zone_code, appointment_type, service_date, slot_index, start_time, end_time, offer_token, is_active, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"
            )
                .bind(&offer.id).bind(&offer.request_id).bind(&offer.offer_group).bind(&offer.zone_code)
                .bind(&offer.appointment_type).bind(offer.service_date).bind(offer.slot_index)
                .bind(offer.start_time).bind(offer.end_time).bind(&offer.offer_token)
                .bind(offer.is_active).bind(offer.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Offer>, AppError> {
        sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE offer_token = $1")
            .bind(token).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_request(&self, request_id: &str) -> Result<Vec<Offer>, AppError> {
        sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE request_id = $1 ORDER BY service_date, slot_index")
            .bind(request_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn deactivate_siblings(
        &self,
        zone_code: &str,
        appointment_type: &str,
        service_date: NaiveDate,
        slot_index: i32,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE offers SET is_active = FALSE WHERE zone_code = $1 AND appointment_type = $2 AND service_date = $3 AND slot_index = $4 AND is_active = TRUE"
        )
            .bind(zone_code).bind(appointment_type).bind(service_date).bind(slot_index)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
