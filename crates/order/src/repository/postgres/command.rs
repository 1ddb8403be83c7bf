use crate::{
    abstract_trait::order::repository::OrderCommandRepositoryTrait,
    domain::requests::{CreateOrderItemRecordRequest, CreateOrderRecordRequest},
    model::order::Order as OrderModel,
    model::order_item::OrderItem as OrderItemModel,
};
use shared::{
    config::ConnectionPool,
    domain::status::{OrderChannel, OrderStatus, PaymentStatus},
    errors::RepositoryError,
};

use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

const INSERT_ORDER: &str = r#"
    INSERT INTO orders (
        order_id, property_id, channel, guest_name, locator, guest_phone,
        status, total_amount, notes, payment_method, payment_status,
        created_at, updated_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8, $9, $10,
            current_timestamp, current_timestamp)
    RETURNING *
"#;

const INSERT_ORDER_ITEM: &str = r#"
    INSERT INTO order_items (
        order_item_id, order_id, quantity, unit_price, total_price,
        item_name, item_description, ingredients, image_ref, portion,
        created_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, current_timestamp)
    RETURNING *
"#;

pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
        items: &[CreateOrderItemRecordRequest],
    ) -> Result<(OrderModel, Vec<OrderItemModel>), RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let order = sqlx::query_as::<_, OrderModel>(INSERT_ORDER)
            .bind(Uuid::new_v4())
            .bind(req.property_id)
            .bind(req.channel.as_str())
            .bind(&req.guest_name)
            .bind(&req.locator)
            .bind(&req.guest_phone)
            .bind(req.total_amount)
            .bind(&req.notes)
            .bind(&req.payment_method)
            .bind(req.payment_status.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to create order for property {}: {:?}",
                    req.property_id, err
                );
                RepositoryError::from(err)
            })?;

        let mut created_items = Vec::with_capacity(items.len());

        for item in items {
            let row = sqlx::query_as::<_, OrderItemModel>(INSERT_ORDER_ITEM)
                .bind(Uuid::new_v4())
                .bind(order.order_id)
                .bind(item.quantity)
                .bind(item.unit_price)
                .bind(item.total_price)
                .bind(&item.item_name)
                .bind(&item.item_description)
                .bind(&item.ingredients)
                .bind(&item.image_ref)
                .bind(&item.portion)
                .fetch_one(&mut *tx)
                .await
                .map_err(|err| {
                    error!(
                        "❌ Failed to create order item for order {}: {:?}",
                        order.order_id, err
                    );
                    RepositoryError::from(err)
                })?;

            created_items.push(row);
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            "✅ Created order {} ({} item(s)) for property {}",
            order.order_id,
            created_items.len(),
            order.property_id
        );
        Ok((order, created_items))
    }

    async fn update_status(
        &self,
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<OrderModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        // Guarded write: only applies while the stored status still equals
        // `from`. Zero rows means the order vanished or another terminal
        // won the race.
        let result = sqlx::query_as::<_, OrderModel>(
            r#"
            UPDATE orders
            SET status = $3, updated_at = current_timestamp
            WHERE order_id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to update status of order {order_id}: {err:?}");
            RepositoryError::from(err)
        })?;

        if result.is_some() {
            info!("🔄 Order {order_id} moved {from} -> {to}");
        }
        Ok(result)
    }

    async fn update_payment_status(
        &self,
        order_id: Uuid,
        payment_status: PaymentStatus,
    ) -> Result<Option<OrderModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, OrderModel>(
            r#"
            UPDATE orders
            SET payment_status = $2, updated_at = current_timestamp
            WHERE order_id = $1
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(payment_status.as_str())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to update payment status of order {order_id}: {err:?}");
            RepositoryError::from(err)
        })?;

        Ok(result)
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<bool, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        // Items go with the order via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to delete order {order_id}: {err:?}");
                RepositoryError::from(err)
            })?;

        let existed = result.rows_affected() > 0;
        if existed {
            info!("🗑️ Deleted order {order_id}");
        }
        Ok(existed)
    }

    async fn bulk_delete_history(
        &self,
        property_id: Uuid,
        channel: OrderChannel,
        statuses: &[OrderStatus],
    ) -> Result<u64, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();

        let result = sqlx::query(
            r#"
            DELETE FROM orders
            WHERE property_id = $1 AND channel = $2 AND status = ANY($3)
            "#,
        )
        .bind(property_id)
        .bind(channel.as_str())
        .bind(&statuses)
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to bulk delete history for property {property_id}/{channel}: {err:?}"
            );
            RepositoryError::from(err)
        })?;

        info!(
            "🗑️ Bulk deleted {} order(s) for property {property_id}/{channel}",
            result.rows_affected()
        );
        Ok(result.rows_affected())
    }
}
