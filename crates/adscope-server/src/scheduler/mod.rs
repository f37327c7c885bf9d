//! Background collection scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the two
//! recurring collection jobs: a six-hourly broad sweep across the full
//! country preset and a once-daily sweep restricted to the top markets.
//! Both jobs share the run-in-progress guard with the manual trigger
//! endpoints, so overlapping triggers are skipped, never queued.

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::scraper::ScraperContext;
use adscope_core::{countries, AppConfig};
use adscope_db::PgAdStore;

/// Builds and starts the background job scheduler.
///
/// The auto-scraping flag is read once at startup; when disabled, no jobs
/// are registered and scheduled triggers cannot fire. Returns the running
/// [`JobScheduler`] handle, which must be kept alive for the lifetime of
/// the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    config: Arc<AppConfig>,
    scraper: Arc<ScraperContext>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    if config.auto_scraping_enabled {
        tracing::info!("automatic collection runs enabled");
        register_broad_sweep_job(&scheduler, pool.clone(), Arc::clone(&scraper)).await?;
        register_top_markets_job(&scheduler, pool, scraper).await?;
    } else {
        tracing::info!(
            "automatic collection runs disabled; set ADSCOPE_AUTO_SCRAPING=true to enable"
        );
    }

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the six-hourly broad sweep (`0 0 */6 * * *`) over the default
/// country preset.
async fn register_broad_sweep_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    scraper: Arc<ScraperContext>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async("0 0 */6 * * *", move |_uuid, _lock| {
        let pool = pool.clone();
        let scraper = Arc::clone(&scraper);

        Box::pin(async move {
            run_guarded(&pool, &scraper, "broad-sweep", None).await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Register the daily top-market sweep at 02:00 (`0 0 2 * * *`).
async fn register_top_markets_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    scraper: Arc<ScraperContext>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async("0 0 2 * * *", move |_uuid, _lock| {
        let pool = pool.clone();
        let scraper = Arc::clone(&scraper);

        Box::pin(async move {
            let top_markets: Vec<String> = countries::TOP_MARKETS
                .iter()
                .map(|c| (*c).to_owned())
                .collect();
            run_guarded(&pool, &scraper, "top-markets", Some(top_markets)).await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Claims the run guard and drives one collection run, logging the outcome.
///
/// A trigger that finds a run already in progress is skipped entirely and
/// logged. The guard clears on every exit path, so a failed run cannot
/// wedge the scheduler.
async fn run_guarded(
    pool: &PgPool,
    scraper: &ScraperContext,
    job: &str,
    country_list: Option<Vec<String>>,
) {
    let Some(_guard) = scraper.try_begin_run() else {
        tracing::info!(job, "scheduler: collection run already in progress; skipping trigger");
        return;
    };

    tracing::info!(job, "scheduler: starting collection run");
    let store = PgAdStore::new(pool.clone());
    let options = scraper.run_options(None, country_list);
    let result = scraper.run(&store, &options).await;

    if result.success {
        tracing::info!(
            job,
            found = result.ads_found,
            saved = result.ads_saved,
            errors = result.errors.len(),
            "scheduler: collection run complete"
        );
    } else {
        tracing::error!(
            job,
            errors = ?result.errors,
            "scheduler: collection run failed"
        );
    }
}
