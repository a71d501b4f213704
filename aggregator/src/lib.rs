pub mod assembler;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod metrics_defs;
pub mod orchestrator;
pub mod records;
pub mod router;
pub mod service;
pub mod transport;

#[cfg(test)]
mod testutils;

use crate::errors::BffError;
use crate::orchestrator::Aggregator;
use crate::router::Router;
use crate::service::BffService;
use shared::admin_service::AdminService;
use shared::http::run_http_service;
use std::sync::Arc;

pub async fn run(config: config::Config) -> Result<(), BffError> {
    shared::metrics_defs::describe_all(metrics_defs::ALL_METRICS);

    let client = transport::build_client(&config)?;
    let aggregator = Aggregator::new(client, config.fetch_timeout());
    tracing::info!(
        encoding = aggregator.client_name(),
        fetch_timeout_secs = config.fetch_timeout_secs,
        "Backend client ready"
    );

    let bff_service = BffService::new(Router::new(Arc::new(aggregator)));
    let bff_task = run_http_service(&config.listener.host, config.listener.port, bff_service);

    let admin_service = AdminService::<_, BffError>::new(|| true);
    let admin_task = run_http_service(
        &config.admin_listener.host,
        config.admin_listener.port,
        admin_service,
    );

    tokio::try_join!(bff_task, admin_task)?;
    Ok(())
}
