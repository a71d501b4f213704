pub mod api;
pub mod config;
pub mod metrics_defs;
pub mod seed;
pub mod store;
pub mod types;

use std::sync::Arc;

pub use api::CatalogApiError;
pub use store::Catalog;

pub async fn run(config: config::Config) -> Result<(), CatalogApiError> {
    shared::metrics_defs::describe_all(metrics_defs::ALL_METRICS);

    let catalog = Catalog::seeded(&config.seed);
    tracing::info!(
        products = config.seed.products,
        sellers = config.seed.sellers,
        brands = config.seed.brands,
        categories = config.seed.categories,
        images = config.seed.images,
        "Catalog seeded"
    );

    api::serve(config.listener, Arc::new(catalog)).await
}
