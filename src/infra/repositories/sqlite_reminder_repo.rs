use crate::domain::{models::reminder::ReminderLog, ports::ReminderLogRepository};
use crate::error::{is_unique_violation, AppError};
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteReminderRepo {
    pool: SqlitePool,
}

impl SqliteReminderRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderLogRepository for SqliteReminderRepo {
    async fn try_claim(&self, booking_id: &str, reminder_type: &str) -> Result<bool, AppError> {
        let log = ReminderLog::new(booking_id, reminder_type);
        let result = sqlx::query(
            "INSERT INTO reminder_logs (id, booking_id, reminder_type, sent_at, status) VALUES (?, ?, ?, ?, ?)"
        )
            .bind(&log.id).bind(&log.booking_id).bind(&log.reminder_type).bind(log.sent_at).bind(&log.status)
            .execute(&self.pool).await;

        match result {
            Ok(_) => Ok(true),
            // losing the insert race means another trigger already owns this send
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(AppError::Database(e)),
        }
    }
}
