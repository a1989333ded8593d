//! Landwatch main entry point

use anyhow::Context;
use clap::Parser;
use landwatch_api::{start_server, AppState};
use landwatch_client::{KbLandClient, RestKeywordStore};
use landwatch_config::{Config, StoreBackend};
use landwatch_core::{load_regions, MemoryKeywordStore, SourceRef, StoreRef};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "landwatch")]
#[command(version)]
#[command(about = "Real-estate transaction search with per-user watch keywords", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level.to_lowercase());
    env_logger::Builder::from_env(env).init();
}

fn build_store(config: &Config) -> anyhow::Result<StoreRef> {
    Ok(match config.store.backend {
        StoreBackend::Rest => {
            let store = RestKeywordStore::new(&config.store).context("Failed to create keyword store client")?;
            log::info!("Keyword store: {}", store.table_url());
            Arc::new(store)
        }
        StoreBackend::Memory => {
            log::warn!("Keyword store: in-memory, keywords are lost on restart");
            Arc::new(MemoryKeywordStore::new())
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = match Config::load(args.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.to_details());
            anyhow::bail!("Failed to load configuration from {}", args.config.display());
        }
    };
    init_logging(&config.logging.level);
    log::info!("Config loaded from {}", args.config.display());

    let regions = load_regions(&config);
    let client = KbLandClient::new(&config.upstream).context("Failed to create transaction API client")?;
    log::info!("Transaction API: {}", client.url());
    let source: SourceRef = Arc::new(client);
    let store = build_store(&config)?;

    let state = AppState::new(config, regions, source, store);
    start_server(state).await.context("Server failed")?;
    Ok(())
}
