use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const REMINDER_24H: &str = "REMINDER_24H";
pub const REMINDER_1H: &str = "REMINDER_1H";

/// Delivery log row. The unique `(booking_id, reminder_type)` pair makes
/// the attempted-insert-first claim the idempotency gate: whoever inserts
/// the row owns the send.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ReminderLog {
    pub id: String,
    pub booking_id: String,
    pub reminder_type: String,
    pub sent_at: DateTime<Utc>,
    pub status: String,
}

impl ReminderLog {
    pub fn new(booking_id: &str, reminder_type: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            booking_id: booking_id.to_string(),
            reminder_type: reminder_type.to_string(),
            sent_at: Utc::now(),
            status: "SENT".to_string(),
        }
    }
}
