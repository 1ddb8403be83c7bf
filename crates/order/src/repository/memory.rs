//! In-memory order store behind the same repository traits as the Postgres
//! implementation. Used by the test suites and by embedded deployments that
//! run without a database.

use crate::{
    abstract_trait::order::repository::{
        OrderCommandRepositoryTrait, OrderItemQueryRepositoryTrait, OrderQueryRepositoryTrait,
    },
    domain::requests::{CreateOrderItemRecordRequest, CreateOrderRecordRequest, ListOrders, SortOrder},
    model::order::Order as OrderModel,
    model::order_item::OrderItem as OrderItemModel,
};
use shared::{
    domain::status::{OrderChannel, OrderStatus, PaymentStatus},
    errors::RepositoryError,
};

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct MemoryState {
    orders: HashMap<Uuid, OrderModel>,
    items: HashMap<Uuid, Vec<OrderItemModel>>,
}

/// Shared handle; clones see the same state. The single mutex makes every
/// check-then-act sequence atomic, matching the guarantees the Postgres
/// implementation gets from guarded UPDATEs.
#[derive(Clone, Default)]
pub struct MemoryOrderRepository {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for MemoryOrderRepository {
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
        items: &[CreateOrderItemRecordRequest],
    ) -> Result<(OrderModel, Vec<OrderItemModel>), RepositoryError> {
        let mut state = self.inner.lock().await;

        let now = Utc::now().naive_utc();
        let order_id = Uuid::new_v4();

        let order = OrderModel {
            order_id,
            property_id: req.property_id,
            channel: req.channel.as_str().to_string(),
            guest_name: req.guest_name.clone(),
            locator: req.locator.clone(),
            guest_phone: req.guest_phone.clone(),
            status: OrderStatus::Pending.as_str().to_string(),
            total_amount: req.total_amount,
            notes: req.notes.clone(),
            payment_method: req.payment_method.clone(),
            payment_status: req.payment_status.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };

        let created_items: Vec<OrderItemModel> = items
            .iter()
            .map(|item| OrderItemModel {
                order_item_id: Uuid::new_v4(),
                order_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price: item.total_price,
                item_name: item.item_name.clone(),
                item_description: item.item_description.clone(),
                ingredients: item.ingredients.clone(),
                image_ref: item.image_ref.clone(),
                portion: item.portion.clone(),
                created_at: now,
            })
            .collect();

        state.orders.insert(order_id, order.clone());
        state.items.insert(order_id, created_items.clone());

        Ok((order, created_items))
    }

    async fn update_status(
        &self,
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<OrderModel>, RepositoryError> {
        let mut state = self.inner.lock().await;

        let Some(order) = state.orders.get_mut(&order_id) else {
            return Ok(None);
        };

        if order.status != from.as_str() {
            return Ok(None);
        }

        order.status = to.as_str().to_string();
        order.updated_at = Utc::now().naive_utc();
        Ok(Some(order.clone()))
    }

    async fn update_payment_status(
        &self,
        order_id: Uuid,
        payment_status: PaymentStatus,
    ) -> Result<Option<OrderModel>, RepositoryError> {
        let mut state = self.inner.lock().await;

        let Some(order) = state.orders.get_mut(&order_id) else {
            return Ok(None);
        };

        order.payment_status = payment_status.as_str().to_string();
        order.updated_at = Utc::now().naive_utc();
        Ok(Some(order.clone()))
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<bool, RepositoryError> {
        let mut state = self.inner.lock().await;

        let existed = state.orders.remove(&order_id).is_some();
        state.items.remove(&order_id);
        Ok(existed)
    }

    async fn bulk_delete_history(
        &self,
        property_id: Uuid,
        channel: OrderChannel,
        statuses: &[OrderStatus],
    ) -> Result<u64, RepositoryError> {
        let mut state = self.inner.lock().await;

        let status_strs: Vec<&str> = statuses.iter().map(OrderStatus::as_str).collect();

        let doomed: Vec<Uuid> = state
            .orders
            .values()
            .filter(|order| {
                order.property_id == property_id
                    && order.channel == channel.as_str()
                    && status_strs.contains(&order.status.as_str())
            })
            .map(|order| order.order_id)
            .collect();

        for order_id in &doomed {
            state.orders.remove(order_id);
            state.items.remove(order_id);
        }

        Ok(doomed.len() as u64)
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for MemoryOrderRepository {
    async fn find_all(&self, req: &ListOrders) -> Result<Vec<OrderModel>, RepositoryError> {
        let state = self.inner.lock().await;

        let status_strs: Option<Vec<&str>> = req
            .statuses
            .as_ref()
            .map(|statuses| statuses.iter().map(OrderStatus::as_str).collect());

        let mut orders: Vec<OrderModel> = state
            .orders
            .values()
            .filter(|order| {
                order.property_id == req.property_id
                    && order.channel == req.channel.as_str()
                    && status_strs
                        .as_ref()
                        .is_none_or(|statuses| statuses.contains(&order.status.as_str()))
            })
            .cloned()
            .collect();

        match req.sort {
            SortOrder::OldestFirst => {
                orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            }
            SortOrder::NewestFirst => {
                orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
        }

        Ok(orders)
    }

    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderModel>, RepositoryError> {
        let state = self.inner.lock().await;
        Ok(state.orders.get(&order_id).cloned())
    }
}

#[async_trait]
impl OrderItemQueryRepositoryTrait for MemoryOrderRepository {
    async fn find_by_order(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItemModel>, RepositoryError> {
        let state = self.inner.lock().await;
        Ok(state.items.get(&order_id).cloned().unwrap_or_default())
    }

    async fn find_by_orders(
        &self,
        order_ids: &[Uuid],
    ) -> Result<Vec<OrderItemModel>, RepositoryError> {
        let state = self.inner.lock().await;

        Ok(order_ids
            .iter()
            .filter_map(|order_id| state.items.get(order_id))
            .flatten()
            .cloned()
            .collect())
    }
}
