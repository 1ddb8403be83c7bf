use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted order line. The `item_*` and `portion` columns are a snapshot
/// of the catalog item taken at order-creation time; catalog edits never
/// touch these rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub order_item_id: Uuid,
    pub order_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub total_price: i64,
    pub item_name: String,
    pub item_description: Option<String>,
    pub ingredients: Option<String>,
    pub image_ref: Option<String>,
    pub portion: Option<String>,
    pub created_at: NaiveDateTime,
}
