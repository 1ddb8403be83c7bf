use serde::{Deserialize, Serialize};
use shared::domain::status::{OrderChannel, OrderStatus, PaymentStatus};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct CreateOrderItemRequest {
    #[validate(range(min = 1))]
    pub quantity: i32,

    #[validate(range(min = 0))]
    #[serde(rename = "unit_price")]
    pub unit_price: i64,

    #[validate(length(min = 1))]
    #[serde(rename = "item_name")]
    pub item_name: String,

    #[serde(rename = "item_description")]
    pub item_description: Option<String>,

    pub ingredients: Option<String>,

    #[serde(rename = "image_ref")]
    pub image_ref: Option<String>,

    pub portion: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct CreateOrderRequest {
    #[serde(rename = "property_id")]
    pub property_id: Uuid,

    pub channel: OrderChannel,

    #[validate(length(min = 1))]
    #[serde(rename = "guest_name")]
    pub guest_name: String,

    #[validate(length(min = 1))]
    pub locator: String,

    #[serde(rename = "guest_phone")]
    pub guest_phone: Option<String>,

    pub notes: Option<String>,

    #[serde(rename = "payment_method")]
    pub payment_method: Option<String>,

    #[serde(rename = "payment_status")]
    pub payment_status: Option<PaymentStatus>,

    #[validate(length(min = 1), nested)]
    pub items: Vec<CreateOrderItemRequest>,
}

/// Sort direction over `created_at`. Kitchen queues read oldest-first;
/// management and history views read newest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    OldestFirst,
    NewestFirst,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ListOrders {
    pub property_id: Uuid,
    pub channel: OrderChannel,
    pub statuses: Option<Vec<OrderStatus>>,
    pub sort: SortOrder,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UpdatePaymentStatusRequest {
    #[serde(rename = "payment_status")]
    pub payment_status: PaymentStatus,
}

/// Irreversible whole-history deletion for one property/channel. The
/// operator confirms twice in the UI; `confirm` carries the second
/// confirmation and the request is rejected without it.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct BulkDeleteHistoryRequest {
    #[serde(rename = "property_id")]
    pub property_id: Uuid,

    pub channel: OrderChannel,

    pub statuses: Option<Vec<OrderStatus>>,

    #[serde(default)]
    pub confirm: bool,
}

/// Fields the command service has already computed for the repository.
#[derive(Debug, Clone)]
pub struct CreateOrderRecordRequest {
    pub property_id: Uuid,
    pub channel: OrderChannel,
    pub guest_name: String,
    pub locator: String,
    pub guest_phone: Option<String>,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
    pub payment_status: PaymentStatus,
    pub total_amount: i64,
}

#[derive(Debug, Clone)]
pub struct CreateOrderItemRecordRequest {
    pub quantity: i32,
    pub unit_price: i64,
    pub total_price: i64,
    pub item_name: String,
    pub item_description: Option<String>,
    pub ingredients: Option<String>,
    pub image_ref: Option<String>,
    pub portion: Option<String>,
}
