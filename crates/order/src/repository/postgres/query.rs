use crate::{
    abstract_trait::order::repository::{OrderItemQueryRepositoryTrait, OrderQueryRepositoryTrait},
    domain::requests::{ListOrders, SortOrder},
    model::order::Order as OrderModel,
    model::order_item::OrderItem as OrderItemModel,
};
use shared::{config::ConnectionPool, errors::RepositoryError};

use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_all(&self, req: &ListOrders) -> Result<Vec<OrderModel>, RepositoryError> {
        info!(
            "📦 Fetching orders for property {} channel {}",
            req.property_id, req.channel
        );

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let direction = match req.sort {
            SortOrder::OldestFirst => "ASC",
            SortOrder::NewestFirst => "DESC",
        };

        let rows = if let Some(statuses) = &req.statuses {
            let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();

            let sql = format!(
                r#"
                SELECT * FROM orders
                WHERE property_id = $1 AND channel = $2 AND status = ANY($3)
                ORDER BY created_at {direction}
                "#
            );

            sqlx::query_as::<_, OrderModel>(&sql)
                .bind(req.property_id)
                .bind(req.channel.as_str())
                .bind(&statuses)
                .fetch_all(&mut *conn)
                .await
        } else {
            let sql = format!(
                r#"
                SELECT * FROM orders
                WHERE property_id = $1 AND channel = $2
                ORDER BY created_at {direction}
                "#
            );

            sqlx::query_as::<_, OrderModel>(&sql)
                .bind(req.property_id)
                .bind(req.channel.as_str())
                .fetch_all(&mut *conn)
                .await
        };

        rows.map_err(|e| {
            error!(
                "❌ Failed to fetch orders for property {}: {:?}",
                req.property_id, e
            );
            RepositoryError::from(e)
        })
    }

    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, OrderModel>("SELECT * FROM orders WHERE order_id = $1")
            .bind(order_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch order {order_id}: {:?}", e);
                RepositoryError::from(e)
            })
    }
}

#[derive(Clone)]
pub struct OrderItemQueryRepository {
    db: ConnectionPool,
}

impl OrderItemQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderItemQueryRepositoryTrait for OrderItemQueryRepository {
    async fn find_by_order(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItemModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, OrderItemModel>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY created_at ASC",
        )
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch items for order {order_id}: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn find_by_orders(
        &self,
        order_ids: &[Uuid],
    ) -> Result<Vec<OrderItemModel>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, OrderItemModel>(
            "SELECT * FROM order_items WHERE order_id = ANY($1) ORDER BY created_at ASC",
        )
        .bind(order_ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch items for {} order(s): {:?}", order_ids.len(), e);
            RepositoryError::from(e)
        })
    }
}
