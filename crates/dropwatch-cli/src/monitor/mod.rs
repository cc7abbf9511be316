//! Monitor command handlers.
//!
//! `run_monitor` wires together the state store, renderer session, and
//! shutdown signal, then hands control to the [`runner::Monitor`] loop.
//! Per-category failures are logged and skipped inside the loop; only
//! renderer acquisition failure and an exhausted consecutive-failure budget
//! propagate out of here as fatal errors.

mod diff;
mod runner;

use anyhow::Context;
use tokio::sync::watch;

use dropwatch_core::AppConfig;
use dropwatch_scraper::HttpRenderer;
use dropwatch_store::StateStore;

use runner::Monitor;

/// Runs the monitor loop until shutdown (or one cycle with `once`).
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the renderer session
/// cannot be acquired, or the loop exceeds its consecutive-failure budget.
pub async fn run_monitor(
    config: &AppConfig,
    once: bool,
    category: Option<String>,
) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(category) = category {
        if !config.categories.contains(&category) {
            tracing::warn!(%category, "category is not in the configured coverage list");
        }
        config.categories = vec![category];
    }

    let store = StateStore::open(&config.data_dir)
        .with_context(|| format!("failed to open state store at {}", config.data_dir.display()))?;

    let renderer = HttpRenderer::acquire(&config)
        .await
        .context("failed to acquire renderer session")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    Monitor::new(config, renderer, store, shutdown_rx)
        .run(once)
        .await
}

/// Prints the products currently known to the store, oldest id first.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub fn run_products(config: &AppConfig) -> anyhow::Result<()> {
    let store = StateStore::open(&config.data_dir)?;
    if store.products().is_empty() {
        println!("no products recorded yet");
        return Ok(());
    }
    for (id, product) in store.products() {
        let variants = store
            .variants_for(id)
            .map_or(0, |state| state.variants.len());
        println!(
            "{id}  [{}]  {}  {}  ({variants} variants, last seen {})",
            product.category, product.title, product.price, product.last_updated
        );
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting orderly shutdown");
}
