use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted order row. `status`, `channel` and `payment_status` are stored
/// as their canonical lowercase strings; the service layer converts to the
/// typed enums before making decisions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub order_id: Uuid,
    pub property_id: Uuid,
    pub channel: String,
    pub guest_name: String,
    pub locator: String,
    pub guest_phone: Option<String>,
    pub status: String,
    pub total_amount: i64,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
