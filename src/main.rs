use std::sync::Arc;

use dk_parts::config::AppConfig;
use dk_parts::db::Database;
use dk_parts::gateway;
use dk_parts::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
    let config = AppConfig::load(&env);
    let _log_guard = logging::init_logging(&config);

    tracing::info!(
        "Starting dk_parts (env={}, build={})",
        env,
        env!("GIT_HASH")
    );

    let db = Arc::new(Database::connect(&config.postgres_url).await?);
    db.init_schema().await?;

    gateway::run_gateway(&config.gateway, db).await
}
