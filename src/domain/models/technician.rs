use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Technician {
    pub id: String,
    pub name: String,
    pub zone_code: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct TimeOff {
    pub id: String,
    pub technician_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
