//! dashboard-server: JSON API over the invoice dashboard query layer.
//!
//! ## Configuration
//! - `dashboard.yaml` in the working directory, `--config <path>`, or the file
//!   named by DASHBOARD_CONFIG
//! - DASHBOARD__SERVER__PORT, DASHBOARD__STORAGE__TYPE, ... override file values
//! - DASHBOARD_LOG: tracing filter (default: info)

use std::sync::Arc;

use tracing::{error, info};

use invoice_dashboard::config::Config;
use invoice_dashboard::handlers::rest;
use invoice_dashboard::services::DashboardService;
use invoice_dashboard::storage::init_storage;
use invoice_dashboard::utils::bootstrap::{init_tracing, parse_config_path};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = parse_config_path();
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        storage = ?config.storage.storage_type,
        rollup = ?config.dashboard.rollup,
        "starting dashboard-server"
    );

    let store = init_storage(&config.storage).await?;

    store
        .init_schema()
        .await
        .map_err(|e| -> Box<dyn std::error::Error> {
            format!("failed to init dashboard schema: {}", e).into()
        })?;

    let service = Arc::new(DashboardService::from_config(store, &config.dashboard));

    rest::serve(service, &config.server)
        .await
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;

    info!("dashboard-server stopped");
    Ok(())
}
