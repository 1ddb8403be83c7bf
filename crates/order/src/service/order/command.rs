use crate::{
    abstract_trait::order::{
        repository::{
            DynOrderCommandRepository, DynOrderItemQueryRepository, DynOrderQueryRepository,
        },
        service::OrderCommandServiceTrait,
    },
    bus::OrderEventBus,
    domain::requests::{
        BulkDeleteHistoryRequest, CreateOrderItemRecordRequest, CreateOrderRecordRequest,
        CreateOrderRequest,
    },
    service::order::order_response,
};
use shared::{
    domain::event::{ChangeSignal, OrderTransition, SignalKind},
    domain::responses::{ApiResponse, OrderResponse},
    domain::status::{OrderStatus, PaymentStatus},
    errors::ServiceError,
    utils::{Method, Metrics, Status},
};

use async_trait::async_trait;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct OrderCommandService {
    command: DynOrderCommandRepository,
    query: DynOrderQueryRepository,
    item_query: DynOrderItemQueryRepository,
    bus: Arc<OrderEventBus>,
    metrics: Metrics,
}

pub struct OrderCommandServiceDeps {
    pub command: DynOrderCommandRepository,
    pub query: DynOrderQueryRepository,
    pub item_query: DynOrderItemQueryRepository,
    pub bus: Arc<OrderEventBus>,
}

impl OrderCommandService {
    pub fn new(deps: OrderCommandServiceDeps, registry: &mut Registry) -> Self {
        let OrderCommandServiceDeps {
            command,
            query,
            item_query,
            bus,
        } = deps;

        let metrics = Metrics::new();

        registry.register(
            "order_command_service_request_counter",
            "Total number of requests to the OrderCommandService",
            metrics.request_counter.clone(),
        );
        registry.register(
            "order_command_service_request_duration",
            "Histogram of request durations for the OrderCommandService",
            metrics.request_duration.clone(),
        );

        Self {
            command,
            query,
            item_query,
            bus,
            metrics,
        }
    }

    fn observe<T>(&self, method: Method, result: &Result<T, ServiceError>, started: Instant) {
        let status = if result.is_ok() {
            Status::Success
        } else {
            Status::Error
        };
        self.metrics
            .record(method, status, started.elapsed().as_secs_f64());
    }

    async fn create_order_inner(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!(
            "🏗️ Creating order for property {} ({} channel)",
            req.property_id, req.channel
        );

        req.validate()
            .map_err(|errors| ServiceError::Validation(validation_messages(&errors)))?;

        let mut total_amount: i64 = 0;
        let mut item_records = Vec::with_capacity(req.items.len());

        for item in &req.items {
            let total_price = item.unit_price * i64::from(item.quantity);
            total_amount += total_price;

            item_records.push(CreateOrderItemRecordRequest {
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price,
                item_name: item.item_name.clone(),
                item_description: item.item_description.clone(),
                ingredients: item.ingredients.clone(),
                image_ref: item.image_ref.clone(),
                portion: item.portion.clone(),
            });
        }

        let record = CreateOrderRecordRequest {
            property_id: req.property_id,
            channel: req.channel,
            guest_name: req.guest_name.clone(),
            locator: req.locator.clone(),
            guest_phone: req.guest_phone.clone(),
            notes: req.notes.clone(),
            payment_method: req.payment_method.clone(),
            payment_status: req.payment_status.unwrap_or(PaymentStatus::Pending),
            total_amount,
        };

        let (order, items) = self
            .command
            .create_order(&record, &item_records)
            .await
            .map_err(ServiceError::Repo)?;

        let response = order_response(order, items)?;

        self.bus.publish(ChangeSignal {
            property_id: req.property_id,
            channel: req.channel,
            kind: SignalKind::Created,
        });

        info!("✅ Order {} created, total {total_amount}", response.id);

        Ok(ApiResponse {
            status: "success".into(),
            message: "Order created successfully".into(),
            data: response,
        })
    }

    async fn update_order_status_inner(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("✏️ Updating order {order_id} status to {status}");

        let order = self
            .query
            .find_by_id(order_id)
            .await
            .map_err(ServiceError::Repo)?
            .ok_or(ServiceError::NotFound)?;

        let current: OrderStatus = order.status.parse().map_err(ServiceError::Internal)?;

        if current == status {
            // Idempotent re-application: succeed without writing, signaling
            // or notifying.
            let items = self
                .item_query
                .find_by_order(order_id)
                .await
                .map_err(ServiceError::Repo)?;

            return Ok(ApiResponse {
                status: "success".into(),
                message: "Order status unchanged".into(),
                data: order_response(order, items)?,
            });
        }

        if !current.can_transition_to(status) {
            return Err(ServiceError::InvalidTransition {
                from: current.as_str().to_string(),
                to: status.as_str().to_string(),
            });
        }

        let updated = self
            .command
            .update_status(order_id, current, status)
            .await
            .map_err(ServiceError::Repo)?;

        let Some(updated) = updated else {
            // The guarded write matched nothing: another terminal moved the
            // order first (or deleted it). Re-read to report accurately.
            let raced = self
                .query
                .find_by_id(order_id)
                .await
                .map_err(ServiceError::Repo)?
                .ok_or(ServiceError::NotFound)?;

            if raced.status == status.as_str() {
                // Both terminals asked for the same transition; the loser's
                // request is an idempotent re-application.
                let items = self
                    .item_query
                    .find_by_order(order_id)
                    .await
                    .map_err(ServiceError::Repo)?;

                return Ok(ApiResponse {
                    status: "success".into(),
                    message: "Order status unchanged".into(),
                    data: order_response(raced, items)?,
                });
            }

            return Err(ServiceError::InvalidTransition {
                from: raced.status,
                to: status.as_str().to_string(),
            });
        };

        let items = self
            .item_query
            .find_by_order(order_id)
            .await
            .map_err(ServiceError::Repo)?;

        let response = order_response(updated, items)?;

        self.bus.publish(ChangeSignal {
            property_id: response.property_id,
            channel: response.channel,
            kind: SignalKind::StatusUpdated,
        });

        self.bus.publish_transition(OrderTransition {
            order: response.clone(),
            previous: current,
            current: status,
        });

        info!("✅ Order {order_id} is now {status}");

        Ok(ApiResponse {
            status: "success".into(),
            message: "Order status updated successfully".into(),
            data: response,
        })
    }

    async fn update_payment_status_inner(
        &self,
        order_id: Uuid,
        payment_status: PaymentStatus,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("✏️ Updating order {order_id} payment status to {payment_status}");

        let updated = self
            .command
            .update_payment_status(order_id, payment_status)
            .await
            .map_err(ServiceError::Repo)?
            .ok_or(ServiceError::NotFound)?;

        let items = self
            .item_query
            .find_by_order(order_id)
            .await
            .map_err(ServiceError::Repo)?;

        let response = order_response(updated, items)?;

        self.bus.publish(ChangeSignal {
            property_id: response.property_id,
            channel: response.channel,
            kind: SignalKind::PaymentUpdated,
        });

        Ok(ApiResponse {
            status: "success".into(),
            message: "Payment status updated successfully".into(),
            data: response,
        })
    }

    async fn delete_order_inner(
        &self,
        order_id: Uuid,
    ) -> Result<ApiResponse<()>, ServiceError> {
        info!("🗑️ Deleting order {order_id}");

        // Read first so the signal can carry the scope; a miss is still a
        // success and publishes nothing (optimistic delete).
        let Some(order) = self
            .query
            .find_by_id(order_id)
            .await
            .map_err(ServiceError::Repo)?
        else {
            info!("🔁 Order {order_id} already gone, nothing to delete");
            return Ok(ApiResponse {
                status: "success".into(),
                message: "Order already deleted".into(),
                data: (),
            });
        };

        let channel = order.channel.parse().map_err(ServiceError::Internal)?;

        let existed = self
            .command
            .delete_order(order_id)
            .await
            .map_err(ServiceError::Repo)?;

        if existed {
            self.bus.publish(ChangeSignal {
                property_id: order.property_id,
                channel,
                kind: SignalKind::Deleted,
            });
        }

        Ok(ApiResponse {
            status: "success".into(),
            message: "Order deleted successfully".into(),
            data: (),
        })
    }

    async fn bulk_delete_history_inner(
        &self,
        req: &BulkDeleteHistoryRequest,
    ) -> Result<ApiResponse<u64>, ServiceError> {
        if !req.confirm {
            return Err(ServiceError::Validation(vec![
                "history deletion must be explicitly confirmed".into(),
            ]));
        }

        let statuses = req
            .statuses
            .clone()
            .unwrap_or_else(|| OrderStatus::TERMINAL.to_vec());

        if let Some(active) = statuses.iter().find(|status| !status.is_terminal()) {
            return Err(ServiceError::Validation(vec![format!(
                "status {active} is not terminal and cannot be bulk deleted"
            )]));
        }

        info!(
            "💀 Bulk deleting {:?} history for property {}/{}",
            statuses, req.property_id, req.channel
        );

        let deleted = self
            .command
            .bulk_delete_history(req.property_id, req.channel, &statuses)
            .await
            .map_err(ServiceError::Repo)?;

        if deleted > 0 {
            self.bus.publish(ChangeSignal {
                property_id: req.property_id,
                channel: req.channel,
                kind: SignalKind::BulkDeleted,
            });
        }

        Ok(ApiResponse {
            status: "success".into(),
            message: format!("Deleted {deleted} order(s) from history"),
            data: deleted,
        })
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let started = Instant::now();
        let result = self.create_order_inner(req).await;

        if let Err(e) = &result {
            error!("❌ Failed to create order: {e}");
        }
        self.observe(Method::Post, &result, started);
        result
    }

    async fn update_order_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let started = Instant::now();
        let result = self.update_order_status_inner(order_id, status).await;

        if let Err(e) = &result {
            error!("❌ Failed to update status of order {order_id}: {e}");
        }
        self.observe(Method::Put, &result, started);
        result
    }

    async fn update_payment_status(
        &self,
        order_id: Uuid,
        payment_status: PaymentStatus,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let started = Instant::now();
        let result = self
            .update_payment_status_inner(order_id, payment_status)
            .await;

        if let Err(e) = &result {
            error!("❌ Failed to update payment status of order {order_id}: {e}");
        }
        self.observe(Method::Put, &result, started);
        result
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<ApiResponse<()>, ServiceError> {
        let started = Instant::now();
        let result = self.delete_order_inner(order_id).await;

        if let Err(e) = &result {
            error!("❌ Failed to delete order {order_id}: {e}");
        }
        self.observe(Method::Delete, &result, started);
        result
    }

    async fn bulk_delete_history(
        &self,
        req: &BulkDeleteHistoryRequest,
    ) -> Result<ApiResponse<u64>, ServiceError> {
        let started = Instant::now();
        let result = self.bulk_delete_history_inner(req).await;

        if let Err(e) = &result {
            error!(
                "❌ Failed to bulk delete history for property {}: {e}",
                req.property_id
            );
        }
        self.observe(Method::Delete, &result, started);
        result
    }
}

pub(crate) fn validation_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                err.message
                    .as_ref()
                    .map(|msg| format!("{field}: {msg}"))
                    .unwrap_or_else(|| format!("{field}: {}", err.code))
            })
        })
        .collect()
}
