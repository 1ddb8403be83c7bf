mod command;
mod query;

pub use self::command::{OrderCommandService, OrderCommandServiceDeps};
pub use self::query::OrderQueryService;

use crate::model::{order::Order as OrderModel, order_item::OrderItem as OrderItemModel};
use shared::{
    domain::responses::{OrderItemResponse, OrderResponse},
    errors::ServiceError,
};

/// Assemble the API shape from a stored order and its items. Fails only on
/// a corrupted row whose status/channel strings no longer parse.
pub(crate) fn order_response(
    order: OrderModel,
    items: Vec<OrderItemModel>,
) -> Result<OrderResponse, ServiceError> {
    let status = order.status.parse().map_err(ServiceError::Internal)?;
    let channel = order.channel.parse().map_err(ServiceError::Internal)?;
    let payment_status = order.payment_status.parse().map_err(ServiceError::Internal)?;

    let items = items
        .into_iter()
        .map(|item| OrderItemResponse {
            id: item.order_item_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price,
            item_name: item.item_name,
            item_description: item.item_description,
            ingredients: item.ingredients,
            image_ref: item.image_ref,
            portion: item.portion,
        })
        .collect();

    Ok(OrderResponse {
        id: order.order_id,
        property_id: order.property_id,
        channel,
        guest_name: order.guest_name,
        locator: order.locator,
        guest_phone: order.guest_phone,
        status,
        total_amount: order.total_amount,
        notes: order.notes,
        payment_method: order.payment_method,
        payment_status,
        created_at: order.created_at.to_string(),
        updated_at: order.updated_at.to_string(),
        items,
    })
}
