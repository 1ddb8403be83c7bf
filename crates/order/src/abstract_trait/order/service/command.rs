use crate::domain::requests::{BulkDeleteHistoryRequest, CreateOrderRequest};
use async_trait::async_trait;
use shared::domain::responses::{ApiResponse, OrderResponse};
use shared::domain::status::{OrderStatus, PaymentStatus};
use shared::errors::ServiceError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandServiceTrait {
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;

    async fn update_order_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;

    async fn update_payment_status(
        &self,
        order_id: Uuid,
        payment_status: PaymentStatus,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;

    async fn delete_order(&self, order_id: Uuid) -> Result<ApiResponse<()>, ServiceError>;

    async fn bulk_delete_history(
        &self,
        req: &BulkDeleteHistoryRequest,
    ) -> Result<ApiResponse<u64>, ServiceError>;
}
