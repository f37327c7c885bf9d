//! HTTP client for the ad-library search endpoint.
//!
//! Every outbound request first passes through the owned [`RateLimiter`],
//! then runs under the per-class [`RetryPolicy`]. Responses surface the
//! server's quota telemetry (`x-app-usage`) for observability.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode, Url};

use crate::error::AdLibraryError;
use crate::rate_limit::{RateLimitStatus, RateLimiter};
use crate::retry::{retry_per_class, RetryPolicy};
use crate::types::{AdArchiveResponse, AppUsage, SearchOutcome, SearchParams};

/// Record fields requested from the search endpoint.
const SEARCH_FIELDS: &[&str] = &[
    "id",
    "ad_creation_time",
    "ad_creative_bodies",
    "ad_creative_link_captions",
    "ad_creative_link_descriptions",
    "ad_creative_link_titles",
    "ad_delivery_start_time",
    "ad_delivery_stop_time",
    "ad_snapshot_url",
    "page_id",
    "page_name",
    "publisher_platforms",
    "languages",
    "media_type",
    "spend",
    "impressions",
];

/// Quota consumption percentage at which a warning is logged.
const USAGE_WARN_PERCENT: u32 = 90;

/// Construction parameters for [`AdLibraryClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL including the API version segment.
    pub base_url: String,
    pub access_token: String,
    pub timeout_secs: u64,
    pub requests_per_hour: u32,
    pub request_delay_ms: u64,
    /// Used to derive the default minimum delivery date for searches.
    pub min_days_running: i64,
}

/// Client for the ad-library search endpoint.
///
/// Owns the outbound [`RateLimiter`]; share one instance per process so the
/// hourly quota is enforced across all callers.
pub struct AdLibraryClient {
    client: Client,
    access_token: String,
    base_url: Url,
    rate_limiter: RateLimiter,
    retry_policy: RetryPolicy,
    min_days_running: i64,
}

impl AdLibraryClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`AdLibraryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AdLibraryError::Rejected`] if `base_url`
    /// is not a valid URL.
    pub fn new(config: &ClientConfig) -> Result<Self, AdLibraryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("adscope/0.1 (ad-intelligence)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // joining the endpoint path appends a segment rather than replacing
        // the version segment.
        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| AdLibraryError::Rejected {
            status: 0,
            message: format!("invalid base URL '{}': {e}", config.base_url),
        })?;

        Ok(Self {
            client,
            access_token: config.access_token.clone(),
            base_url,
            rate_limiter: RateLimiter::new(config.requests_per_hour, config.request_delay_ms),
            retry_policy: RetryPolicy::default(),
            min_days_running: config.min_days_running,
        })
    }

    /// Replaces the retry policy (tests use zero-delay backoffs).
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Issues paginated search requests, following the response cursor
    /// until no further cursor is present or `max_pages` is reached.
    ///
    /// A transient page failure (retries exhausted, network error, bad
    /// body) ends pagination early: records collected so far are returned
    /// with the failure recorded in [`SearchOutcome::page_error`].
    ///
    /// # Errors
    ///
    /// Returns [`AdLibraryError::Rejected`] (HTTP 400/401/403) immediately —
    /// a misconfigured credential fails the whole fetch phase.
    pub async fn search(
        &self,
        params: &SearchParams,
        max_pages: u32,
    ) -> Result<SearchOutcome, AdLibraryError> {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages_fetched = 0u32;

        while pages_fetched < max_pages {
            match self.fetch_page(params, cursor.as_deref()).await {
                Ok(response) => {
                    pages_fetched += 1;
                    tracing::info!(
                        page = pages_fetched,
                        records = response.data.len(),
                        "fetched ad-library page"
                    );
                    let next = response.next_cursor().map(str::to_owned);
                    records.extend(response.data);
                    match next {
                        Some(c) => cursor = Some(c),
                        None => break,
                    }
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    tracing::warn!(
                        page = pages_fetched + 1,
                        error = %err,
                        "page fetch failed; ending pagination early"
                    );
                    return Ok(SearchOutcome {
                        records,
                        pages_fetched,
                        page_error: Some(format!(
                            "page {} fetch failed: {err}",
                            pages_fetched + 1
                        )),
                    });
                }
            }
        }

        tracing::info!(
            total = records.len(),
            pages = pages_fetched,
            "ad-library search complete"
        );
        Ok(SearchOutcome {
            records,
            pages_fetched,
            page_error: None,
        })
    }

    /// Snapshot of the owned rate limiter, for status endpoints.
    pub async fn rate_limit_status(&self) -> RateLimitStatus {
        self.rate_limiter.status().await
    }

    /// Fetches a single page under the retry policy. Every attempt passes
    /// through the rate limiter before going on the wire.
    async fn fetch_page(
        &self,
        params: &SearchParams,
        after: Option<&str>,
    ) -> Result<AdArchiveResponse, AdLibraryError> {
        retry_per_class(&self.retry_policy, || async move {
            self.rate_limiter.acquire().await;
            let url = self.build_search_url(params, after);
            self.request_page(url).await
        })
        .await
    }

    async fn request_page(&self, url: Url) -> Result<AdArchiveResponse, AdLibraryError> {
        let response = self.client.get(url.clone()).send().await?;
        observe_usage(response.headers());

        let status = response.status();
        match status {
            StatusCode::TOO_MANY_REQUESTS => return Err(AdLibraryError::RateLimited),
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => {
                return Err(AdLibraryError::ServerError {
                    status: status.as_u16(),
                })
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let message = extract_error_message(&response.text().await.unwrap_or_default());
                tracing::error!(
                    status = status.as_u16(),
                    %message,
                    "ad-library request rejected; check the access token and its ads_read permission"
                );
                return Err(AdLibraryError::Rejected {
                    status: status.as_u16(),
                    message,
                });
            }
            s if !s.is_success() => {
                return Err(AdLibraryError::UnexpectedStatus {
                    status: s.as_u16(),
                    url: url.to_string(),
                })
            }
            _ => {}
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AdLibraryError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Builds the full request URL with percent-encoded query parameters.
    fn build_search_url(&self, params: &SearchParams, after: Option<&str>) -> Url {
        // base_url ends with a slash, so join appends the endpoint segment.
        let mut url = self
            .base_url
            .join("ads_archive")
            .unwrap_or_else(|_| self.base_url.clone());

        let delivery_date_min = params
            .delivery_date_min
            .clone()
            .unwrap_or_else(|| default_delivery_date_min(self.min_days_running));

        let countries_json = serde_json::to_string(&params.reached_countries)
            .unwrap_or_else(|_| "[]".to_owned());

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("access_token", &self.access_token);
            pairs.append_pair("ad_active_status", params.active_status.as_str());
            pairs.append_pair("ad_delivery_date_min", &delivery_date_min);
            pairs.append_pair("ad_reached_countries", &countries_json);
            pairs.append_pair("fields", &SEARCH_FIELDS.join(","));
            pairs.append_pair("limit", &params.limit.to_string());

            if let Some(terms) = &params.search_terms {
                pairs.append_pair("search_terms", terms);
            }
            if let Some(media_type) = &params.media_type {
                pairs.append_pair("media_type", media_type);
            }
            if let Some(platforms) = &params.publisher_platforms {
                let json = serde_json::to_string(platforms).unwrap_or_else(|_| "[]".to_owned());
                pairs.append_pair("publisher_platforms", &json);
            }
            if let Some(languages) = &params.languages {
                let json = serde_json::to_string(languages).unwrap_or_else(|_| "[]".to_owned());
                pairs.append_pair("languages", &json);
            }
            if let Some(cursor) = after {
                pairs.append_pair("after", cursor);
            }
        }
        url
    }
}

/// `ad_delivery_date_min` default: `min_days_running` days ago, `YYYY-MM-DD`.
fn default_delivery_date_min(min_days_running: i64) -> String {
    let date = chrono::Utc::now() - chrono::Duration::days(min_days_running);
    date.format("%Y-%m-%d").to_string()
}

/// Parses the `x-app-usage` header and logs quota consumption. A usage
/// level at or above [`USAGE_WARN_PERCENT`] is logged as a warning but does
/// not alter behavior.
fn observe_usage(headers: &HeaderMap) {
    let Some(raw) = headers.get("x-app-usage").and_then(|v| v.to_str().ok()) else {
        return;
    };
    match serde_json::from_str::<AppUsage>(raw) {
        Ok(usage) if usage.call_count >= USAGE_WARN_PERCENT => {
            tracing::warn!(
                call_count = usage.call_count,
                regain_secs = usage.estimated_time_to_regain_access,
                "ad-library quota nearly exhausted"
            );
        }
        Ok(usage) => {
            tracing::debug!(
                call_count = usage.call_count,
                total_time = usage.total_time,
                "ad-library quota status"
            );
        }
        Err(e) => {
            tracing::debug!(error = %e, "unparseable x-app-usage header");
        }
    }
}

/// Pulls the human-readable message out of an error envelope body, falling
/// back to the raw body (truncated) when the shape is unexpected.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
