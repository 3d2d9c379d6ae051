//! Order intake: cart validation, totals, atomic stock reservation
//!
//! The one place in the system that mutates shared inventory counters.
//! Validation runs read-only and in request order; all writes happen in
//! one transaction with pessimistic row locks on the inventory rows, so
//! no partial order is ever visible and two concurrent checkouts cannot
//! both take the last unit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Row, Transaction};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::addresses::{AddressForm, AddressStore};
use crate::catalog::ProductManager;
use crate::db::Database;
use crate::models::{OrderStatus, PaymentMethod, ProductStock, StockMovementType};

use super::cart::{self, CartLine};
use super::error::CheckoutError;
use super::order_number::generate_order_number;

/// Comment written with the initial PENDING history row
const CREATED_COMMENT: &str = "Order created";

/// Checkout request payload
///
/// `cart_items` is the JSON-encoded line array exactly as the storefront
/// serialized it. Prices inside it are never read.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub payment_method: String,
    pub cart_items: String,
    #[serde(default)]
    pub customer_note: Option<String>,
    /// Existing address id; when absent, `address` fields are required
    #[serde(default)]
    pub address_id: Option<Uuid>,
    #[serde(default)]
    pub address: Option<AddressForm>,
}

/// Successful checkout result; the storefront redirects to the order page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    pub order_number: String,
    pub status: String,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// One priced line snapshot, computed before any write
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub product_sku: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub total_price: Decimal,
}

/// Price the cart against the catalog snapshot and pre-check availability
///
/// Pure and side-effect free: calling it twice over the same snapshot
/// yields the same result. Lines are checked in cart order and the first
/// availability violation is reported. Prices come only from `products`.
pub fn build_order_lines(
    lines: &[CartLine],
    products: &[ProductStock],
) -> Result<(Vec<OrderLine>, Decimal), CheckoutError> {
    let mut order_lines = Vec::with_capacity(lines.len());
    let mut subtotal = Decimal::ZERO;

    for line in lines {
        let product = products
            .iter()
            .find(|p| p.product_id == line.product_id)
            .ok_or(CheckoutError::ProductUnavailable)?;

        let available = product.available();
        if available < line.quantity as i32 {
            return Err(CheckoutError::InsufficientStock {
                product_name: product.name.clone(),
                available,
            });
        }

        let quantity = line.quantity as i32;
        let total_price = product.price * Decimal::from(quantity);
        subtotal += total_price;

        order_lines.push(OrderLine {
            product_id: product.product_id,
            product_name: product.name.clone(),
            product_sku: product.sku.clone(),
            unit_price: product.price,
            quantity,
            total_price,
        });
    }

    Ok((order_lines, subtotal))
}

/// Order intake service
pub struct CheckoutService;

impl CheckoutService {
    /// Validate the cart and place the order, reserving stock atomically
    ///
    /// Validation order: caller identity, payment method, cart payload,
    /// address, product resolution, per-line availability. All failures
    /// up to this point happen before any order write (a fresh address
    /// row may already exist; it is caller data, not order state).
    pub async fn place_order(
        db: &Database,
        user_id: i64,
        req: CheckoutRequest,
    ) -> Result<CheckoutResponse, CheckoutError> {
        if user_id <= 0 {
            return Err(CheckoutError::Unauthenticated);
        }

        let payment = PaymentMethod::from_str(req.payment_method.trim())
            .map_err(|_| CheckoutError::InvalidPayment)?;

        let lines = cart::parse_cart_lines(&req.cart_items)?;

        let pool = db.pool();

        // Resolve or create the shipping address, scoped to the caller.
        let address_id = match req.address_id {
            Some(id) => {
                AddressStore::get_for_user(pool, id, user_id)
                    .await?
                    .ok_or_else(|| CheckoutError::InvalidAddress("Address not found".to_string()))?
                    .address_id
            }
            None => {
                let form = req.address.as_ref().ok_or_else(|| {
                    CheckoutError::InvalidAddress("Shipping address is required".to_string())
                })?;
                if let Some(msg) = form.first_error() {
                    return Err(CheckoutError::InvalidAddress(msg));
                }
                AddressStore::create(pool, user_id, form).await?.address_id
            }
        };

        // One read resolves every distinct id to an active product + stock.
        let product_ids = cart::distinct_product_ids(&lines);
        let products = ProductManager::load_for_checkout(pool, &product_ids).await?;
        if products.len() < product_ids.len() {
            return Err(CheckoutError::ProductUnavailable);
        }

        let (order_lines, subtotal) = build_order_lines(&lines, &products)?;
        // Total equals subtotal until a shipping/tax component exists.
        let total = subtotal;

        let mut tx = pool.begin().await?;

        let order_id = Uuid::new_v4();
        let order_number = pick_order_number(&mut tx).await?;

        let created_at: DateTime<Utc> = sqlx::query(
            r#"INSERT INTO orders_tb
                 (order_id, order_number, user_id, address_id, payment_method,
                  status, subtotal, total, customer_note)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING created_at"#,
        )
        .bind(order_id)
        .bind(&order_number)
        .bind(user_id)
        .bind(address_id)
        .bind(payment.as_str())
        .bind(OrderStatus::Pending.as_str())
        .bind(subtotal)
        .bind(total)
        .bind(&req.customer_note)
        .fetch_one(&mut *tx)
        .await?
        .get("created_at");

        for line in &order_lines {
            sqlx::query(
                r#"INSERT INTO order_items_tb
                     (order_item_id, order_id, product_id, product_name,
                      product_sku, unit_price, quantity, total_price)
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
            )
            .bind(Uuid::new_v4())
            .bind(order_id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(&line.product_sku)
            .bind(line.unit_price)
            .bind(line.quantity)
            .bind(line.total_price)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"INSERT INTO order_status_history_tb (order_id, status, comment)
               VALUES ($1, $2, $3)"#,
        )
        .bind(order_id)
        .bind(OrderStatus::Pending.as_str())
        .bind(CREATED_COMMENT)
        .execute(&mut *tx)
        .await?;

        // Reserve stock per line, in cart order. The pre-check above ran
        // without locks, so re-check under FOR UPDATE: between the read
        // and this point a concurrent checkout may have taken the stock.
        for (line, order_line) in lines.iter().zip(&order_lines) {
            reserve_line(&mut tx, line, &order_line.product_name, &order_number).await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Order {} placed: user={} items={} total={}",
            order_number,
            user_id,
            order_lines.len(),
            total
        );

        Ok(CheckoutResponse {
            order_id,
            order_number,
            status: OrderStatus::Pending.as_str().to_string(),
            total,
            created_at,
        })
    }
}

/// Generate an order number that is not already taken
///
/// The 3-digit random suffix collides easily on a busy day, so probe the
/// unique index first and regenerate. A collision that lands between the
/// probe and the insert still aborts the transaction via the unique
/// index and surfaces as a database error.
async fn pick_order_number(tx: &mut Transaction<'_, Postgres>) -> Result<String, CheckoutError> {
    for _ in 0..5 {
        let candidate = generate_order_number();
        let taken = sqlx::query("SELECT 1 FROM orders_tb WHERE order_number = $1")
            .bind(&candidate)
            .fetch_optional(&mut **tx)
            .await?
            .is_some();
        if !taken {
            return Ok(candidate);
        }
        tracing::warn!("Order number {} already taken, regenerating", candidate);
    }
    // 5 misses means the day's 1000-number space is nearly full
    Err(CheckoutError::Database(sqlx::Error::Protocol(
        "order number space exhausted".to_string(),
    )))
}

/// Lock one inventory row, re-check availability, move stock to reserved
/// and append the ledger entry.
async fn reserve_line(
    tx: &mut Transaction<'_, Postgres>,
    line: &CartLine,
    product_name: &str,
    order_number: &str,
) -> Result<(), CheckoutError> {
    let requested = line.quantity as i32;

    let row = sqlx::query(
        "SELECT quantity, reserved_qty FROM inventory_tb WHERE product_id = $1 FOR UPDATE",
    )
    .bind(line.product_id)
    .fetch_optional(&mut **tx)
    .await?;

    let available = match row {
        Some(r) => r.get::<i32, _>("quantity") - r.get::<i32, _>("reserved_qty"),
        // No inventory row means nothing has ever been stocked.
        None => 0,
    };

    if available < requested {
        return Err(CheckoutError::InsufficientStock {
            product_name: product_name.to_string(),
            available,
        });
    }

    sqlx::query("UPDATE inventory_tb SET reserved_qty = reserved_qty + $1 WHERE product_id = $2")
        .bind(requested)
        .bind(line.product_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query(
        r#"INSERT INTO stock_movements_tb (product_id, movement_type, quantity, reference, note)
           VALUES ($1, $2, $3, $4, $5)"#,
    )
    .bind(line.product_id)
    .bind(StockMovementType::Reservation.as_str())
    .bind(-requested)
    .bind(order_number)
    .bind("Reserved for order")
    .execute(&mut **tx)
    .await?;

    Ok(())
}
