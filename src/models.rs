//! Domain rows and enums for the catalog / order flow
//!
//! Row structs map 1:1 onto the PostgreSQL tables created by
//! [`crate::db::Database::init_schema`]. Enums are stored as TEXT and
//! converted explicitly at the query boundary (no DB enum types).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

// ============================================================================
// Enums (TEXT-mapped)
// ============================================================================

/// Payment method selected at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Click,
    Payme,
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Click => "CLICK",
            PaymentMethod::Payme => "PAYME",
            PaymentMethod::CashOnDelivery => "CASH_ON_DELIVERY",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLICK" => Ok(PaymentMethod::Click),
            "PAYME" => Ok(PaymentMethod::Payme),
            "CASH_ON_DELIVERY" => Ok(PaymentMethod::CashOnDelivery),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle status
///
/// Checkout only ever writes `Pending`; later transitions belong to
/// fulfillment, which is a separate concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "CONFIRMED" => Ok(OrderStatus::Confirmed),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stock movement ledger entry type
///
/// Checkout only ever writes `Reservation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockMovementType {
    Reservation,
    Release,
    Purchase,
    Sale,
    Adjustment,
}

impl StockMovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockMovementType::Reservation => "RESERVATION",
            StockMovementType::Release => "RELEASE",
            StockMovementType::Purchase => "PURCHASE",
            StockMovementType::Sale => "SALE",
            StockMovementType::Adjustment => "ADJUSTMENT",
        }
    }
}

impl fmt::Display for StockMovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Catalog rows
// ============================================================================

/// Product row: the catalog entry checkout prices against
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct Product {
    pub product_id: Uuid,
    pub sku: String,
    pub slug: String,
    pub name: String,
    pub oem_number: Option<String>,
    /// Current unit price; the only price source for order items
    pub price: Decimal,
    pub is_active: bool,
}

/// Inventory row, one-to-one with a product
///
/// `reserved_qty <= quantity` is the intended invariant. It is enforced
/// operationally by the checkout transaction's row lock, not by a
/// constraint, so a manual UPDATE bypassing the service can break it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Inventory {
    pub product_id: Uuid,
    pub quantity: i32,
    pub reserved_qty: i32,
}

impl Inventory {
    /// Units that can still be promised to new orders
    pub fn available(&self) -> i32 {
        self.quantity - self.reserved_qty
    }
}

/// Product joined with its inventory, as read by the checkout query
#[derive(Debug, Clone, FromRow)]
pub struct ProductStock {
    pub product_id: Uuid,
    pub sku: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub reserved_qty: i32,
}

impl ProductStock {
    pub fn available(&self) -> i32 {
        self.quantity - self.reserved_qty
    }
}

// ============================================================================
// Order rows
// ============================================================================

/// Persisted order header
///
/// `subtotal`/`total` are immutable after creation; `total == subtotal`
/// until a shipping/tax component exists.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct Order {
    pub order_id: Uuid,
    pub order_number: String,
    pub user_id: i64,
    pub address_id: Uuid,
    pub payment_method: String,
    pub status: String,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub customer_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Point-in-time snapshot of one cart line
///
/// Denormalized on purpose: later product edits must not rewrite
/// historical orders.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct OrderItem {
    pub order_item_id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_sku: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub total_price: Decimal,
}

/// Append-only status transition log entry
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct OrderStatusHistory {
    pub history_id: i64,
    pub order_id: Uuid,
    pub status: String,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Address row
// ============================================================================

/// Shipping address, scoped to the owning user
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct Address {
    pub address_id: Uuid,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub city: String,
    pub district: Option<String>,
    pub street: String,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub landmark: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_roundtrip() {
        for m in [
            PaymentMethod::Click,
            PaymentMethod::Payme,
            PaymentMethod::CashOnDelivery,
        ] {
            assert_eq!(PaymentMethod::from_str(m.as_str()), Ok(m));
        }
    }

    #[test]
    fn test_payment_method_rejects_unknown() {
        assert!(PaymentMethod::from_str("BITCOIN").is_err());
        assert!(PaymentMethod::from_str("").is_err());
        // lowercase is not accepted, the wire format is SCREAMING_SNAKE_CASE
        assert!(PaymentMethod::from_str("click").is_err());
    }

    #[test]
    fn test_order_status_roundtrip() {
        assert_eq!(OrderStatus::from_str("PENDING"), Ok(OrderStatus::Pending));
        assert_eq!(OrderStatus::Pending.as_str(), "PENDING");
        assert!(OrderStatus::from_str("UNKNOWN").is_err());
    }

    #[test]
    fn test_available_is_quantity_minus_reserved() {
        let inv = Inventory {
            product_id: Uuid::new_v4(),
            quantity: 10,
            reserved_qty: 3,
        };
        assert_eq!(inv.available(), 7);
    }

    #[test]
    fn test_available_can_go_negative_without_lock() {
        // The row lock in checkout prevents this path; the type itself
        // does not clamp, so audits can see an oversold state if one
        // ever happens.
        let inv = Inventory {
            product_id: Uuid::new_v4(),
            quantity: 2,
            reserved_qty: 5,
        };
        assert_eq!(inv.available(), -3);
    }
}
