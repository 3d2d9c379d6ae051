//! Human-readable order number generation
//!
//! Format: `DK-YYYYMMDD-NNN` with a zero-padded random 3-digit suffix.
//! Uniqueness is best-effort by construction; the insert path relies on
//! the unique index on `orders_tb.order_number` and regenerates once on
//! conflict.

use chrono::Utc;
use rand::Rng;

pub const ORDER_NUMBER_PREFIX: &str = "DK";

/// Generate an order number like `DK-20260830-042`
pub fn generate_order_number() -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    format!("{}-{}-{:03}", ORDER_NUMBER_PREFIX, date, suffix)
}
