use crate::{
    domain::requests::{CreateOrderItemRecordRequest, CreateOrderRecordRequest},
    model::order::Order as OrderModel,
    model::order_item::OrderItem as OrderItemModel,
};
use async_trait::async_trait;
use shared::domain::status::{OrderChannel, OrderStatus, PaymentStatus};
use shared::errors::RepositoryError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Persist the order and all of its items atomically.
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
        items: &[CreateOrderItemRecordRequest],
    ) -> Result<(OrderModel, Vec<OrderItemModel>), RepositoryError>;

    /// Compare-and-set status write. Applies only while the stored status
    /// still equals `from`; returns `None` when no row matched, so a lost
    /// race surfaces instead of silently overwriting the winner.
    async fn update_status(
        &self,
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<OrderModel>, RepositoryError>;

    async fn update_payment_status(
        &self,
        order_id: Uuid,
        payment_status: PaymentStatus,
    ) -> Result<Option<OrderModel>, RepositoryError>;

    /// Hard delete, cascading to items. Returns whether a row existed.
    async fn delete_order(&self, order_id: Uuid) -> Result<bool, RepositoryError>;

    /// Delete every order of the property/channel whose status is in
    /// `statuses`. Returns the number of orders removed.
    async fn bulk_delete_history(
        &self,
        property_id: Uuid,
        channel: OrderChannel,
        statuses: &[OrderStatus],
    ) -> Result<u64, RepositoryError>;
}
