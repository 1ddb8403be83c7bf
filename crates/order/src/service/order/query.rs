use crate::{
    abstract_trait::order::{
        repository::{DynOrderItemQueryRepository, DynOrderQueryRepository},
        service::OrderQueryServiceTrait,
    },
    domain::requests::ListOrders,
    model::order_item::OrderItem as OrderItemModel,
    service::order::order_response,
};
use shared::{
    domain::responses::{ApiResponse, OrderResponse},
    errors::ServiceError,
    utils::{Method, Metrics, Status},
};

use async_trait::async_trait;
use prometheus_client::registry::Registry;
use std::collections::HashMap;
use tokio::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    item_query: DynOrderItemQueryRepository,
    metrics: Metrics,
}

impl OrderQueryService {
    pub fn new(
        query: DynOrderQueryRepository,
        item_query: DynOrderItemQueryRepository,
        registry: &mut Registry,
    ) -> Self {
        let metrics = Metrics::new();

        registry.register(
            "order_query_service_request_counter",
            "Total number of requests to the OrderQueryService",
            metrics.request_counter.clone(),
        );
        registry.register(
            "order_query_service_request_duration",
            "Histogram of request durations for the OrderQueryService",
            metrics.request_duration.clone(),
        );

        Self {
            query,
            item_query,
            metrics,
        }
    }

    fn observe<T>(&self, result: &Result<T, ServiceError>, started: Instant) {
        let status = if result.is_ok() {
            Status::Success
        } else {
            Status::Error
        };
        self.metrics
            .record(Method::Get, status, started.elapsed().as_secs_f64());
    }

    async fn list_orders_inner(
        &self,
        req: &ListOrders,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        info!(
            "📦 Listing orders for property {} channel {} ({:?})",
            req.property_id, req.channel, req.statuses
        );

        let orders = self.query.find_all(req).await.map_err(ServiceError::Repo)?;

        let order_ids: Vec<Uuid> = orders.iter().map(|order| order.order_id).collect();
        let items = self
            .item_query
            .find_by_orders(&order_ids)
            .await
            .map_err(ServiceError::Repo)?;

        let mut items_by_order: HashMap<Uuid, Vec<OrderItemModel>> = HashMap::new();
        for item in items {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        let responses = orders
            .into_iter()
            .map(|order| {
                let order_items = items_by_order.remove(&order.order_id).unwrap_or_default();
                order_response(order, order_items)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ApiResponse {
            status: "success".into(),
            message: format!("Found {} order(s)", responses.len()),
            data: responses,
        })
    }

    async fn find_by_id_inner(
        &self,
        order_id: Uuid,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let order = self
            .query
            .find_by_id(order_id)
            .await
            .map_err(ServiceError::Repo)?
            .ok_or(ServiceError::NotFound)?;

        let items = self
            .item_query
            .find_by_order(order_id)
            .await
            .map_err(ServiceError::Repo)?;

        Ok(ApiResponse {
            status: "success".into(),
            message: "Order found".into(),
            data: order_response(order, items)?,
        })
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn list_orders(
        &self,
        req: &ListOrders,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        let started = Instant::now();
        let result = self.list_orders_inner(req).await;

        if let Err(e) = &result {
            error!(
                "❌ Failed to list orders for property {}: {e}",
                req.property_id
            );
        }
        self.observe(&result, started);
        result
    }

    async fn find_by_id(
        &self,
        order_id: Uuid,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let started = Instant::now();
        let result = self.find_by_id_inner(order_id).await;

        if let Err(e) = &result {
            error!("❌ Failed to fetch order {order_id}: {e}");
        }
        self.observe(&result, started);
        result
    }
}
