use crate::{
    domain::requests::ListOrders, model::order::Order as OrderModel,
    model::order_item::OrderItem as OrderItemModel,
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderQueryRepository = Arc<dyn OrderQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryRepositoryTrait {
    async fn find_all(&self, req: &ListOrders) -> Result<Vec<OrderModel>, RepositoryError>;
    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderModel>, RepositoryError>;
}

pub type DynOrderItemQueryRepository = Arc<dyn OrderItemQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderItemQueryRepositoryTrait {
    async fn find_by_order(&self, order_id: Uuid)
    -> Result<Vec<OrderItemModel>, RepositoryError>;

    /// Batched lookup for list views; one round trip instead of one per
    /// order.
    async fn find_by_orders(
        &self,
        order_ids: &[Uuid],
    ) -> Result<Vec<OrderItemModel>, RepositoryError>;
}
