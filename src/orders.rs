//! Read side for committed orders (order list and detail pages)
//!
//! Plain reads outside any transaction; checkout owns all writes.

use crate::models::{Order, OrderItem, OrderStatusHistory};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

/// Full order as rendered on the detail page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub history: Vec<OrderStatusHistory>,
}

pub struct OrderStore;

impl OrderStore {
    /// List the caller's orders, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Order>, sqlx::Error> {
        let rows: Vec<Order> = sqlx::query_as(
            r#"SELECT order_id, order_number, user_id, address_id, payment_method,
                      status, subtotal, total, customer_note, created_at
               FROM orders_tb WHERE user_id = $1
               ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Fetch one order with items and status history, caller-scoped
    pub async fn get_for_user(
        pool: &PgPool,
        order_id: Uuid,
        user_id: i64,
    ) -> Result<Option<OrderDetail>, sqlx::Error> {
        let order: Option<Order> = sqlx::query_as(
            r#"SELECT order_id, order_number, user_id, address_id, payment_method,
                      status, subtotal, total, customer_note, created_at
               FROM orders_tb WHERE order_id = $1 AND user_id = $2"#,
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items: Vec<OrderItem> = sqlx::query_as(
            r#"SELECT order_item_id, order_id, product_id, product_name,
                      product_sku, unit_price, quantity, total_price
               FROM order_items_tb WHERE order_id = $1"#,
        )
        .bind(order_id)
        .fetch_all(pool)
        .await?;

        let history: Vec<OrderStatusHistory> = sqlx::query_as(
            r#"SELECT history_id, order_id, status, comment, created_at
               FROM order_status_history_tb WHERE order_id = $1
               ORDER BY history_id"#,
        )
        .bind(order_id)
        .fetch_all(pool)
        .await?;

        Ok(Some(OrderDetail {
            order,
            items,
            history,
        }))
    }
}
