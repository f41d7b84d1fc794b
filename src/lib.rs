pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use logic::{Catalog, CatalogError, CatalogResult, Repository, ResolutionMap};

// Export all model types
pub use model::*;

// Export seed module
pub use seed::*;

// Export store types
pub use store::{EntityStore, JsonFileStore, MemoryStore, StoreError};

/// Serve the catalog API over `store` until the listener fails.
pub async fn run_server<S: EntityStore + 'static>(
    store: std::sync::Arc<S>,
    config: &crate::config::AppConfig,
) -> anyhow::Result<()> {
    use axum::serve;
    use tokio::net::TcpListener;

    let app = crate::api::routes::create_router().with_state(store);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Museum catalog server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
