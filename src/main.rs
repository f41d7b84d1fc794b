use museum_catalog::config::AppConfig;
use museum_catalog::seed;
use museum_catalog::store::JsonFileStore;
use museum_catalog::{run_server, Catalog};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Info by default, RUST_LOG overrides
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Museum Collection Catalog Server");

    // Load configuration
    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}, data_dir={}",
        config.server.host, config.server.port, config.storage.data_dir
    );

    let store = Arc::new(JsonFileStore::new(config.data_dir()));

    if config.should_load_seed() {
        println!("Loading seed data from {}...", config.seed.path);
        let report = seed::import_seed_file(Catalog::new(store.clone()), &config.seed.path).await?;
        println!(
            "Seed data loaded: {} created, {} skipped",
            report.total_created(),
            report.skipped.len()
        );
    }

    run_server(store, &config).await?;

    Ok(())
}
