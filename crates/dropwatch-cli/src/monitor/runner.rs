//! The monitor loop: drives the polling cadence across categories and owns
//! failure recovery.
//!
//! One cycle is a strictly sequential pass over the configured categories,
//! with a randomized short pause between categories and a fixed pause
//! between cycles. Per-category failures are logged and skipped; only a run
//! of consecutive failed categories beyond the configured budget is fatal.
//! The shutdown signal is observed at every pause and between fetches, and
//! triggers a store flush before returning.

use std::time::{Duration, Instant};

use chrono::Utc;
use rand::Rng;
use tokio::sync::watch;

use dropwatch_core::{AppConfig, MonitorStats};
use dropwatch_scraper::{extract_products, fetch_variants, PageRenderer, ScraperError};
use dropwatch_store::StateStore;

use super::diff::{self, ReconcileOutcome, VariantFetch};

pub struct Monitor<R: PageRenderer> {
    config: AppConfig,
    renderer: R,
    store: StateStore,
    stats: MonitorStats,
    consecutive_failures: u32,
    shutdown: watch::Receiver<bool>,
}

impl<R: PageRenderer> Monitor<R> {
    pub fn new(
        config: AppConfig,
        renderer: R,
        store: StateStore,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            renderer,
            store,
            stats: MonitorStats::default(),
            consecutive_failures: 0,
            shutdown,
        }
    }

    /// Runs monitoring cycles until shutdown, or a single cycle with `once`.
    ///
    /// # Errors
    ///
    /// Returns an error only when the consecutive-failure budget is
    /// exceeded; everything else is recovered at the category boundary.
    pub async fn run(mut self, once: bool) -> anyhow::Result<()> {
        loop {
            let cycle_started = Instant::now();
            tracing::info!(
                categories = self.config.categories.len(),
                "starting monitoring cycle"
            );

            let categories = self.config.categories.clone();
            for category in &categories {
                if self.shutdown_requested() {
                    return self.finish();
                }

                match self.process_category(category).await {
                    Ok(outcome) => {
                        self.consecutive_failures = 0;
                        tracing::info!(
                            category,
                            new_products = outcome.new_products.len(),
                            availability_events = outcome.availability_events.len(),
                            "category pass complete"
                        );
                    }
                    Err(e) => {
                        self.consecutive_failures += 1;
                        tracing::error!(
                            category,
                            error = %e,
                            consecutive_failures = self.consecutive_failures,
                            "category pass failed"
                        );
                        if self.consecutive_failures >= self.config.max_consecutive_failures {
                            self.flush_store();
                            anyhow::bail!(
                                "aborting after {} consecutive category failures (last: {e})",
                                self.consecutive_failures
                            );
                        }
                    }
                }

                if self.pause_between_categories().await {
                    return self.finish();
                }
            }

            self.log_cycle_stats(cycle_started);

            if once {
                return self.finish();
            }

            tracing::info!(
                secs = self.config.check_interval_secs,
                "cycle complete, waiting before next check"
            );
            if self
                .wait(Duration::from_secs(self.config.check_interval_secs))
                .await
            {
                return self.finish();
            }
        }
    }

    /// Render → extract → per-product variant fetch → reconcile → persist
    /// for one category. Any error returned here is a per-category failure.
    async fn process_category(&mut self, category: &str) -> Result<ReconcileOutcome, ScraperError> {
        let url = self.config.category_url(category);
        tracing::debug!(category, %url, "rendering category listing");

        let page = match self.renderer.fetch_json(&url).await {
            Ok(page) => {
                self.stats.record_success();
                page
            }
            Err(e) => {
                self.stats.record_failure();
                return Err(e);
            }
        };

        let products = extract_products(category, &page)?;
        tracing::info!(category, products = products.len(), "extracted products");

        let mut fresh = Vec::with_capacity(products.len());
        for product in products {
            // The shutdown signal must be observable between fetches; what
            // was already fetched still gets reconciled and flushed below.
            if self.shutdown_requested() {
                break;
            }

            let product_url = self.config.product_url(&product.handle);
            let fetch = match fetch_variants(&self.renderer, &product_url).await {
                Ok(variants) => {
                    self.stats.record_success();
                    VariantFetch::Fetched(variants)
                }
                Err(e) => {
                    self.stats.record_failure();
                    tracing::warn!(
                        handle = %product.handle,
                        error = %e,
                        "variant fetch failed, treating as no new information"
                    );
                    VariantFetch::Failed
                }
            };
            fresh.push((product, fetch));
        }

        let outcome = diff::reconcile(&mut self.store, category, fresh, &mut self.stats, Utc::now());

        // A persist failure risks silent data loss, so it is surfaced at
        // error severity, but the cycle keeps going with in-memory state.
        if let Err(e) = self.store.persist_products() {
            tracing::error!(error = %e, "failed to persist product store");
        }
        for id in &outcome.touched {
            if let Err(e) = self.store.persist_variants(id) {
                tracing::error!(id, error = %e, "failed to persist variant record");
            }
        }

        Ok(outcome)
    }

    /// Randomized short pause before the next category. Returns `true` on
    /// shutdown.
    async fn pause_between_categories(&mut self) -> bool {
        let min = self.config.category_pause_min_ms;
        let max = self.config.category_pause_max_ms;
        if max == 0 {
            return self.shutdown_requested();
        }
        let pause_ms = {
            let mut rng = rand::rng();
            rng.random_range(min..=max)
        };
        self.wait(Duration::from_millis(pause_ms)).await
    }

    /// Sleeps for `duration` unless shutdown arrives first. Returns `true`
    /// on shutdown.
    async fn wait(&mut self, duration: Duration) -> bool {
        tokio::select! {
            () = tokio::time::sleep(duration) => false,
            changed = self.shutdown.changed() => {
                // A dropped sender also means the process is going down.
                changed.is_err() || *self.shutdown.borrow()
            }
        }
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Orderly shutdown: flush in-memory state, then return cleanly so the
    /// process exits with status 0.
    fn finish(self) -> anyhow::Result<()> {
        self.flush_store();
        tracing::info!("monitor stopped");
        Ok(())
    }

    fn flush_store(&self) {
        if let Err(e) = self.store.flush() {
            tracing::error!(error = %e, "failed to flush state store");
        }
    }

    fn log_cycle_stats(&self, cycle_started: Instant) {
        tracing::info!(
            runtime_secs = cycle_started.elapsed().as_secs(),
            requests = self.stats.requests,
            successful_requests = self.stats.successful_requests,
            failed_requests = self.stats.failed_requests,
            new_products = self.stats.new_products,
            variants_found = self.stats.variants_found,
            "cycle statistics (cumulative since start)"
        );
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
