use order::abstract_trait::order::service::{DynOrderCommandService, DynOrderQueryService};
use order::bus::OrderEventBus;
use order::domain::requests::{ListOrders, SortOrder};
use shared::domain::responses::OrderResponse;
use shared::domain::status::{OrderChannel, OrderStatus};
use shared::errors::ServiceError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// How long a terminal waits for a list refetch before surfacing a
/// "could not load" condition instead of an empty screen.
pub const LIST_TIMEOUT: Duration = Duration::from_secs(5);

/// One staff terminal's view of a property/channel order stream.
///
/// Holds a local copy of the order list, applies its own mutations
/// optimistically, and converges back to the store by replacing the list
/// wholesale after every change signal or own mutation. The store stays
/// authoritative; this cache is only ever a render source.
pub struct OrderTerminal {
    property_id: Uuid,
    channel: OrderChannel,
    sort: SortOrder,
    query: DynOrderQueryService,
    command: DynOrderCommandService,
    fetch_timeout: Duration,
    orders: Vec<OrderResponse>,
    last_reconciled: Vec<OrderResponse>,
}

impl OrderTerminal {
    pub fn new(
        property_id: Uuid,
        channel: OrderChannel,
        query: DynOrderQueryService,
        command: DynOrderCommandService,
    ) -> Self {
        Self {
            property_id,
            channel,
            sort: SortOrder::NewestFirst,
            query,
            command,
            fetch_timeout: LIST_TIMEOUT,
            orders: Vec::new(),
            last_reconciled: Vec::new(),
        }
    }

    /// Kitchen terminals work the queue oldest-first.
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn property_id(&self) -> Uuid {
        self.property_id
    }

    /// The current local list, in the terminal's sort order.
    pub fn orders(&self) -> &[OrderResponse] {
        &self.orders
    }

    /// Replace the local list with an authoritative read. Distinguishes a
    /// stalled backend ([`ServiceError::Timeout`]) from "no orders exist".
    pub async fn reconcile(&mut self) -> Result<(), ServiceError> {
        let request = ListOrders {
            property_id: self.property_id,
            channel: self.channel,
            statuses: None,
            sort: self.sort,
        };

        let response = timeout(self.fetch_timeout, self.query.list_orders(&request))
            .await
            .map_err(|_| {
                warn!(
                    "⏱️ Order list fetch for property {} timed out after {:?}",
                    self.property_id, self.fetch_timeout
                );
                ServiceError::Timeout
            })??;

        self.orders = response.data.clone();
        self.last_reconciled = response.data;

        debug!(
            "🔄 Terminal reconciled: {} order(s) for property {}",
            self.orders.len(),
            self.property_id
        );
        Ok(())
    }

    /// Apply a status change optimistically, confirm it with the store, and
    /// refetch. A rejected mutation rolls the local list back to the last
    /// reconciled state before the error is surfaced.
    pub async fn update_status(
        &mut self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<(), ServiceError> {
        if let Some(order) = self.orders.iter_mut().find(|order| order.id == order_id) {
            order.status = status;
        }

        match self.command.update_order_status(order_id, status).await {
            Ok(_) => self.reconcile().await,
            Err(e) => {
                self.orders = self.last_reconciled.clone();
                // Best effort: the store may have moved on under us.
                let _ = self.reconcile().await;
                Err(e)
            }
        }
    }

    /// Optimistic delete. The store treats a missing order as success, so
    /// the local removal only reverts if the command itself fails.
    pub async fn delete_order(&mut self, order_id: Uuid) -> Result<(), ServiceError> {
        self.orders.retain(|order| order.id != order_id);

        match self.command.delete_order(order_id).await {
            Ok(_) => self.reconcile().await,
            Err(e) => {
                self.orders = self.last_reconciled.clone();
                let _ = self.reconcile().await;
                Err(e)
            }
        }
    }

    /// Signal-driven sync loop. Subscribes to the terminal's property,
    /// reconciles once up front, and refetches on every signal. A lagged
    /// receiver just reconciles; a closed channel re-subscribes. Runs until
    /// the owning task is dropped, which also drops the subscription and
    /// stops delivery immediately.
    pub async fn run(&mut self, bus: Arc<OrderEventBus>) -> Result<(), ServiceError> {
        loop {
            let mut subscription = bus.subscribe(self.property_id);
            info!(
                "📡 Terminal watching property {} ({})",
                self.property_id, self.channel
            );

            self.reconcile().await?;

            loop {
                match subscription.recv().await {
                    Ok(signal) => {
                        debug!("📥 Change signal {:?}, reconciling", signal.kind);
                        self.reconcile().await?;
                    }
                    Err(RecvError::Lagged(missed)) => {
                        debug!("⚠️ Missed {missed} signal(s), reconciling anyway");
                        self.reconcile().await?;
                    }
                    Err(RecvError::Closed) => {
                        warn!("Signal channel closed, re-subscribing");
                        break;
                    }
                }
            }
        }
    }
}
