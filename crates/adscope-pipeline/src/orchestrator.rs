//! Collection run orchestration.

use adscope_core::{countries, AdStore};
use chrono::Utc;

use crate::classifier::filter_records;
use crate::transform::transform_record;
use crate::types::{ClassifierConfig, RunOptions, RunResult};
use adscope_adlibrary::types::SearchParams;
use adscope_adlibrary::AdLibraryClient;

/// Executes one end-to-end collection run.
///
/// 1. Build search parameters (broad sweep preset when no countries given).
/// 2. Fetch up to `max_pages` batches through the rate-limited client.
/// 3. Drop records failing the baseline quality filter.
/// 4. Transform each survivor and upsert it through the store.
/// 5. Return the aggregated [`RunResult`].
///
/// This function never fails past its boundary: a fatal fetch error marks
/// the run unsuccessful but still returns partial counts and the error
/// list, and per-record persistence failures are isolated.
pub async fn run_collection<S: AdStore>(
    client: &AdLibraryClient,
    store: &S,
    config: &ClassifierConfig,
    options: &RunOptions,
) -> RunResult {
    let mut result = RunResult::default();
    let now = Utc::now();

    let run_countries: Vec<String> = options.countries.clone().unwrap_or_else(|| {
        countries::DEFAULT_SWEEP_COUNTRIES
            .iter()
            .map(|c| (*c).to_owned())
            .collect()
    });

    // Single-country runs stamp that country on the normalized entity;
    // multi-country runs fall back to the configured default.
    let country_code = if run_countries.len() == 1 {
        run_countries[0].clone()
    } else {
        config.default_country_code.clone()
    };

    let params = SearchParams {
        reached_countries: run_countries,
        search_terms: options.search_terms.clone(),
        limit: options.page_size,
        ..SearchParams::default()
    };

    tracing::info!(
        max_pages = options.max_pages,
        search_terms = params.search_terms.as_deref().unwrap_or(""),
        "starting collection run"
    );

    // Step 1: fetch paginated batches. The client rate-limits and retries
    // internally; only a fatal (auth/misconfiguration) error reaches here.
    let outcome = match client.search(&params, options.max_pages).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "collection run failed during fetch");
            result.errors.push(format!("ad-library fetch failed: {e}"));
            return result;
        }
    };

    result.ads_found = outcome.records.len();
    if let Some(page_error) = outcome.page_error {
        result.errors.push(page_error);
    }

    // Step 2: baseline acceptance filter; rejects are dropped silently.
    let accepted = filter_records(outcome.records, config, now);
    tracing::info!(
        found = result.ads_found,
        accepted = accepted.len(),
        "filtered collected records"
    );

    // Step 3: transform and persist. Per-record failures are recorded with
    // the record's external id and do not abort the remaining records.
    let total = accepted.len();
    for record in &accepted {
        let ad = transform_record(record, config, &country_code, now);
        match store.upsert_ad(&ad).await {
            Ok(_) => {
                result.ads_processed += 1;
                result.ads_saved += 1;
                if result.ads_processed % 10 == 0 {
                    tracing::info!(
                        processed = result.ads_processed,
                        total,
                        "collection progress"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(ad_id = %ad.ad_library_id, error = %e, "failed to persist ad");
                result
                    .errors
                    .push(format!("failed to save ad {}: {e}", ad.ad_library_id));
            }
        }
    }

    result.success = true;
    tracing::info!(
        found = result.ads_found,
        saved = result.ads_saved,
        errors = result.errors.len(),
        "collection run complete"
    );
    result
}
