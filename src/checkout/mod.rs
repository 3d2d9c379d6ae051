//! Checkout: the order intake flow
//!
//! Submodules:
//! - [`cart`]: cart payload parsing
//! - [`order_number`]: human-readable order number generation
//! - [`service`]: validation, totals, and the reservation transaction
//! - [`error`]: the checkout failure taxonomy

pub mod cart;
pub mod error;
pub mod order_number;
pub mod service;

#[cfg(test)]
mod integration_tests;

pub use cart::{CartLine, parse_cart_lines};
pub use error::CheckoutError;
pub use order_number::generate_order_number;
pub use service::{CheckoutRequest, CheckoutResponse, CheckoutService, build_order_lines};
