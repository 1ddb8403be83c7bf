use crate::domain::status::{OrderChannel, OrderStatus, PaymentStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One line of an order, carrying the catalog snapshot captured when the
/// order was placed. Catalog edits after that moment never show up here.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub total_price: i64,
    pub item_name: String,
    pub item_description: Option<String>,
    pub ingredients: Option<String>,
    pub image_ref: Option<String>,
    pub portion: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderResponse {
    pub id: Uuid,
    pub property_id: Uuid,
    pub channel: OrderChannel,
    pub guest_name: String,
    pub locator: String,
    pub guest_phone: Option<String>,
    pub status: OrderStatus,
    pub total_amount: i64,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
    pub payment_status: PaymentStatus,
    #[serde(rename = "created_at")]
    pub created_at: String,
    #[serde(rename = "updated_at")]
    pub updated_at: String,
    pub items: Vec<OrderItemResponse>,
}
