use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Repair appointment as booked by a customer. Status transitions are written
/// by the back-office; this service only reads them back and notifies.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub profile_id: Option<Uuid>,
    pub customer_email: String,
    pub device: String,
    pub status: String,
    pub items: Json<Vec<RepairItem>>,
    pub scheduled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairItem {
    pub name: String,
    pub price: Decimal,
}
