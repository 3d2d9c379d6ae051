//! HTTP gateway: router assembly and server startup

pub mod handlers;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::GatewayConfig;
use crate::db::Database;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_order,
        handlers::list_orders,
        handlers::get_order,
        handlers::get_product,
        handlers::health_check,
    ),
    components(schemas(
        crate::checkout::CheckoutRequest,
        crate::checkout::CheckoutResponse,
        crate::addresses::AddressForm,
        crate::models::Product,
        crate::models::Order,
        crate::models::OrderItem,
        crate::models::OrderStatusHistory,
        crate::orders::OrderDetail,
        handlers::HealthResponse,
    )),
    info(
        title = "DK Parts Order API",
        description = "Checkout and order intake for the DK auto-parts storefront"
    )
)]
struct ApiDoc;

/// Build the application router
pub fn build_router(db: Arc<Database>) -> Router {
    let state = Arc::new(AppState::new(db));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health_check))
        .route("/api/v1/checkout", post(handlers::create_order))
        .route("/api/v1/orders", get(handlers::list_orders))
        .route("/api/v1/orders/{id}", get(handlers::get_order))
        .route("/api/v1/products/{id}", get(handlers::get_product))
        .with_state(state)
}

/// Bind and serve until shutdown
pub async fn run_gateway(config: &GatewayConfig, db: Arc<Database>) -> anyhow::Result<()> {
    let app = build_router(db);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Gateway listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
