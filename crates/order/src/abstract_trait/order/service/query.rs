use crate::domain::requests::ListOrders;
use async_trait::async_trait;
use shared::domain::responses::{ApiResponse, OrderResponse};
use shared::errors::ServiceError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderQueryService = Arc<dyn OrderQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryServiceTrait {
    async fn list_orders(
        &self,
        req: &ListOrders,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError>;

    async fn find_by_id(&self, order_id: Uuid)
    -> Result<ApiResponse<OrderResponse>, ServiceError>;
}
