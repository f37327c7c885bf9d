//! Shared scraper state: the configured ad-library client, classifier
//! thresholds, and the run-in-progress guard.
//!
//! The guard is the sole concurrency-control primitive for collection
//! runs: the scheduler's timer callbacks and the manual trigger endpoints
//! all pass through [`ScraperContext::try_begin_run`], and its
//! check-and-set is a single atomic step, so two triggers firing
//! concurrently can never both start a run.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use adscope_adlibrary::rate_limit::RateLimitStatus;
use adscope_adlibrary::{AdLibraryClient, AdLibraryError, ClientConfig};
use adscope_core::AppConfig;
use adscope_db::PgAdStore;
use adscope_pipeline::{run_collection, ClassifierConfig, RunOptions, RunResult};

/// Scheduler/rate-limiter state exposed through the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ScraperStatus {
    pub is_running: bool,
    pub rate_limit: RateLimitStatus,
}

pub struct ScraperContext {
    client: AdLibraryClient,
    classifier: ClassifierConfig,
    max_pages: u32,
    page_size: u32,
    running: AtomicBool,
}

impl ScraperContext {
    /// Builds the shared context from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdLibraryError`] if the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, AdLibraryError> {
        let client = AdLibraryClient::new(&ClientConfig {
            base_url: config.adlib_base_url.clone(),
            access_token: config.adlib_access_token.clone(),
            timeout_secs: config.request_timeout_secs,
            requests_per_hour: config.requests_per_hour,
            request_delay_ms: config.request_delay_ms,
            min_days_running: config.min_days_running,
        })?;

        Ok(Self {
            client,
            classifier: ClassifierConfig::from_app_config(config),
            max_pages: config.max_pages_per_run,
            page_size: config.page_size,
            running: AtomicBool::new(false),
        })
    }

    /// Claims the run-in-progress flag. Returns `None` when a run is
    /// already active — the caller skips entirely, no queueing or waiting.
    ///
    /// The returned guard clears the flag on drop, success or failure, so
    /// a crashed run cannot permanently wedge the scheduler.
    pub fn try_begin_run(&self) -> Option<RunGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
            .then(|| RunGuard { ctx: self })
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run activity plus the rate limiter snapshot, for observability.
    pub async fn status(&self) -> ScraperStatus {
        ScraperStatus {
            is_running: self.is_running(),
            rate_limit: self.client.rate_limit_status().await,
        }
    }

    /// Run options with configured page bounds applied.
    #[must_use]
    pub fn run_options(
        &self,
        search_terms: Option<String>,
        countries: Option<Vec<String>>,
    ) -> RunOptions {
        RunOptions {
            search_terms,
            countries,
            max_pages: self.max_pages,
            page_size: self.page_size,
        }
    }

    /// Executes one collection run against the given store. Callers must
    /// hold a [`RunGuard`] for the duration.
    pub async fn run(&self, store: &PgAdStore, options: &RunOptions) -> RunResult {
        run_collection(&self.client, store, &self.classifier, options).await
    }
}

/// RAII handle for the run-in-progress flag; clears it unconditionally.
pub struct RunGuard<'a> {
    ctx: &'a ScraperContext,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.ctx.running.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::sync::Arc;

    fn test_context() -> Arc<ScraperContext> {
        let config = AppConfig {
            database_url: "postgres://example".to_string(),
            env: adscope_core::Environment::Test,
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
            log_level: "info".to_string(),
            db_max_connections: 10,
            db_min_connections: 1,
            db_acquire_timeout_secs: 10,
            adlib_base_url: "https://graph.example.test/v21.0".to_string(),
            adlib_access_token: "token".to_string(),
            requests_per_hour: 200,
            request_delay_ms: 0,
            request_timeout_secs: 30,
            min_days_running: 4,
            gold_score_threshold: 80,
            silver_score_threshold: 60,
            auto_scraping_enabled: false,
            max_pages_per_run: 3,
            page_size: 100,
            default_country_code: "US".to_string(),
        };
        Arc::new(ScraperContext::new(&config).expect("context should build"))
    }

    #[tokio::test]
    async fn second_trigger_is_skipped_while_a_run_is_active() {
        let ctx = test_context();

        let guard = ctx.try_begin_run().expect("first trigger claims the flag");
        assert!(ctx.is_running());
        assert!(
            ctx.try_begin_run().is_none(),
            "concurrent trigger must be skipped, not queued"
        );
        assert!(ctx.status().await.is_running);

        drop(guard);
        assert!(!ctx.is_running());
        assert!(ctx.try_begin_run().is_some(), "flag clears after the run");
    }

    #[tokio::test]
    async fn concurrent_triggers_claim_the_flag_exactly_once() {
        let ctx = test_context();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let ctx = Arc::clone(&ctx);
            handles.push(tokio::spawn(async move {
                ctx.try_begin_run().map(std::mem::forget).is_some()
            }));
        }

        let mut claimed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                claimed += 1;
            }
        }
        assert_eq!(claimed, 1, "check-and-set must be atomic across triggers");
    }

    #[tokio::test]
    async fn run_options_carry_configured_page_bounds() {
        let ctx = test_context();
        let options = ctx.run_options(Some("fitness".to_owned()), None);
        assert_eq!(options.max_pages, 3);
        assert_eq!(options.page_size, 100);
        assert_eq!(options.search_terms.as_deref(), Some("fitness"));
        assert!(options.countries.is_none());
    }
}
