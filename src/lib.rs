//! DK Parts - order intake backend for an auto-parts storefront
//!
//! The storefront and admin UI live elsewhere; this service owns the one
//! workflow with real consistency concerns: turning a cart into an order
//! while atomically reserving stock, with no oversell under concurrent
//! checkouts.
//!
//! # Modules
//!
//! - [`models`] - Domain rows and TEXT-mapped enums
//! - [`catalog`] - Product + inventory reads
//! - [`addresses`] - Shipping address validation and persistence
//! - [`checkout`] - Cart parsing, totals, the reservation transaction
//! - [`orders`] - Read side for committed orders
//! - [`gateway`] - Axum HTTP surface
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`config`] / [`logging`] - YAML config and tracing setup

pub mod addresses;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod orders;

// Convenient re-exports at crate root
pub use checkout::{CheckoutError, CheckoutRequest, CheckoutResponse, CheckoutService};
pub use db::Database;
pub use models::{Order, OrderItem, OrderStatus, PaymentMethod, StockMovementType};
