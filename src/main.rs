//! shellcache CLI - drive the offline cache manager from the command line.
//!
//! The CLI plays the host-runtime role: it triggers the lifecycle
//! transitions the manager never triggers itself (install, activate) and
//! can route single requests through the manager for inspection.

use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shellcache::{
    BucketStore, FetchOutcome, ManagerConfig, NetClient, OfflineCacheManager, OutboundRequest,
};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Set up logging with environment-based filter
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = ManagerConfig::load()?;

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--install") => install(config).await,
        Some("--status") => status(config),
        Some("--purge") => purge(config),
        Some("--fetch") => {
            let url = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("--fetch requires a URL"))?;
            fetch_one(config, url).await
        }
        _ => {
            usage();
            Ok(())
        }
    }
}

fn usage() {
    println!("shellcache - offline HTTP cache manager");
    println!();
    println!("Usage:");
    println!("  shellcache --install      populate the shell cache and activate");
    println!("  shellcache --status       show managed buckets and entry ages");
    println!("  shellcache --purge        delete buckets outside the allow-list");
    println!("  shellcache --fetch <URL>  route one request through the manager");
    println!();
    println!("Configuration lives at ~/.config/shellcache/config.json");
}

/// Populate the shell cache from the configured origin, then activate.
async fn install(config: ManagerConfig) -> Result<()> {
    let client = NetClient::new()?;
    let mut manager = OfflineCacheManager::new(config, client)?;

    let cached = manager.install().await?;
    let purged = manager.activate()?;

    println!("Cached {} shell assets", cached);
    for name in &purged {
        println!("Purged old bucket: {}", name);
    }

    // Persist the configuration so it can be edited for the next run
    manager.config().save()?;
    info!("Install complete");
    Ok(())
}

/// Show the managed buckets, their entry counts, and newest entry ages.
fn status(config: ManagerConfig) -> Result<()> {
    let store = BucketStore::new(config.resolve_bucket_root()?)?;
    let allowed = config.allowed_buckets();

    for name in &allowed {
        let bucket = store.bucket(name)?;
        let count = bucket.entry_count()?;
        let age = bucket.newest_age().unwrap_or_else(|| "never".to_string());
        println!("{}: {} entries, updated {}", name, count, age);
    }

    for name in store.bucket_names()? {
        if !allowed.contains(&name) {
            println!("{}: not in allow-list (removed on next activate)", name);
        }
    }
    Ok(())
}

/// Delete every bucket outside the current allow-list.
fn purge(config: ManagerConfig) -> Result<()> {
    let store = BucketStore::new(config.resolve_bucket_root()?)?;
    let removed = store.retain(&config.allowed_buckets())?;

    if removed.is_empty() {
        println!("Nothing to purge");
    } else {
        for name in removed {
            println!("Purged bucket: {}", name);
        }
    }
    Ok(())
}

/// Route one GET request through the manager and report the outcome.
async fn fetch_one(config: ManagerConfig, url: &str) -> Result<()> {
    let client = NetClient::new()?;
    let mut manager = OfflineCacheManager::new(config, client)?;
    manager.activate()?;

    let request = OutboundRequest::parse("GET", url)?;
    match manager.handle(&request).await? {
        FetchOutcome::Network(snapshot) => {
            println!("network: status {} ({} bytes)", snapshot.status, snapshot.body.len());
        }
        FetchOutcome::Cached(entry) => {
            println!(
                "cache: status {} ({} bytes, stored {})",
                entry.snapshot.status,
                entry.snapshot.body.len(),
                entry.age_display()
            );
        }
        FetchOutcome::Degraded => {
            println!("degraded: no cached copy and the network request failed");
        }
        FetchOutcome::PassThrough => {
            println!("pass-through: request is not intercepted");
        }
    }
    Ok(())
}
