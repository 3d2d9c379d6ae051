//! HTTP handlers: checkout, order reads, health

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::catalog::ProductManager;
use crate::checkout::{CheckoutRequest, CheckoutResponse, CheckoutService};
use crate::models::{Order, Product};
use crate::orders::{OrderDetail, OrderStore};

use super::state::AppState;
use super::types::{ApiError, ApiResponse, ApiResult, ok};

/// Resolve the caller identity supplied by the session layer
///
/// The identity provider terminates upstream and forwards the verified
/// user id in `X-User-Id`; this service trusts it without re-verifying
/// credentials.
fn caller_id(headers: &HeaderMap) -> Result<i64, ApiError> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::unauthorized("Sign in to continue"))
}

/// Place an order from the current cart
///
/// POST /api/v1/checkout
#[utoipa::path(
    post,
    path = "/api/v1/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order placed, stock reserved", body = CheckoutResponse),
        (status = 400, description = "Invalid payload, unavailable product, or insufficient stock"),
        (status = 401, description = "No caller identity"),
        (status = 500, description = "Transaction failed")
    ),
    tag = "Checkout"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<CheckoutResponse> {
    let user_id = caller_id(&headers)?;
    tracing::info!("Checkout request from user {}", user_id);

    match CheckoutService::place_order(&state.db, user_id, req).await {
        Ok(resp) => ok(resp),
        Err(e) => {
            if e.is_business() {
                tracing::info!("Checkout rejected for user {}: {}", user_id, e);
            }
            Err(e.into())
        }
    }
}

/// List the caller's orders, newest first
///
/// GET /api/v1/orders
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    responses(
        (status = 200, description = "Order list", body = Vec<Order>),
        (status = 401, description = "No caller identity")
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Vec<Order>> {
    let user_id = caller_id(&headers)?;

    let orders = OrderStore::list_for_user(state.db.pool(), user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list orders for user {}: {}", user_id, e);
            ApiError::internal()
        })?;

    ok(orders)
}

/// Fetch one order with items and status history
///
/// GET /api/v1/orders/{id}
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order detail", body = OrderDetail),
        (status = 401, description = "No caller identity"),
        (status = 404, description = "Order not found or not the caller's")
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(order_id): Path<Uuid>,
) -> ApiResult<OrderDetail> {
    let user_id = caller_id(&headers)?;

    let detail = OrderStore::get_for_user(state.db.pool(), order_id, user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load order {}: {}", order_id, e);
            ApiError::internal()
        })?;

    match detail {
        Some(d) => ok(d),
        None => ApiError::not_found("Order not found").into_err(),
    }
}

/// Fetch one product by id (public, no identity required)
///
/// GET /api/v1/products/{id}
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found")
    ),
    tag = "Catalog"
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<Uuid>,
) -> ApiResult<Product> {
    let product = ProductManager::get_by_id(state.db.pool(), product_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load product {}: {}", product_id, e);
            ApiError::internal()
        })?;

    match product {
        Some(p) => ok(p),
        None => ApiError::not_found("Product not found").into_err(),
    }
}

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_u64)]
    pub timestamp_ms: u64,
}

/// Health check endpoint
///
/// Pings the database; reports unhealthy without exposing internals.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Service unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<HealthResponse>>, ApiError> {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    match state.db.health_check().await {
        Ok(()) => ok(HealthResponse { timestamp_ms: now_ms }),
        Err(e) => {
            tracing::error!("[HEALTH] PostgreSQL ping failed: {}", e);
            Err(ApiError::new(
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                super::types::error_codes::SERVICE_UNAVAILABLE,
                "unavailable",
            ))
        }
    }
}
