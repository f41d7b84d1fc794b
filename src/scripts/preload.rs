use anyhow::{Context, Result};
use museum_catalog::config::AppConfig;
use museum_catalog::seed::{ImportPipeline, ImportReport, SeedDocument};
use museum_catalog::store::{JsonFileStore, MemoryStore};
use museum_catalog::Catalog;
use std::sync::Arc;

fn print_report(report: &ImportReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    for skipped in &report.skipped {
        println!(
            "Skipped {} #{} '{}': unresolved reference '{}'",
            skipped.stage, skipped.position, skipped.label, skipped.reference
        );
    }
    Ok(())
}

/// Usage: preload [seed-path] [--dry-run]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load()?;

    let mut dry_run = false;
    let mut seed_path = config.seed.path.clone();
    for arg in std::env::args().skip(1) {
        if arg == "--dry-run" {
            dry_run = true;
        } else {
            seed_path = arg;
        }
    }

    let seed = SeedDocument::from_path(&seed_path).await?;
    println!("Loaded seed document {} ({} records)", seed_path, seed.total_records());

    let result = if dry_run {
        println!("Dry run: importing into memory only");
        ImportPipeline::new(Catalog::new(Arc::new(MemoryStore::new())))
            .run(&seed)
            .await
    } else {
        println!("Importing into {}", config.storage.data_dir);
        ImportPipeline::new(Catalog::new(Arc::new(JsonFileStore::new(config.data_dir()))))
            .run(&seed)
            .await
    };
    let report = result.with_context(|| format!("Error preloading data from {}", seed_path))?;

    print_report(&report)?;
    println!("Data preload completed successfully!");

    Ok(())
}
