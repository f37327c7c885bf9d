//! Offline unit tests for adscope-db pool configuration and row types.
//! These tests do not require a live database connection.

use adscope_core::{AppConfig, Environment};
use adscope_db::{AdFilter, AdSort, PoolConfig, SortOrder, TierMetrics};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        adlib_base_url: "https://graph.example.test/v21.0".to_string(),
        adlib_access_token: "token".to_string(),
        requests_per_hour: 200,
        request_delay_ms: 3000,
        request_timeout_secs: 30,
        min_days_running: 4,
        gold_score_threshold: 80,
        silver_score_threshold: 60,
        auto_scraping_enabled: false,
        max_pages_per_run: 3,
        page_size: 100,
        default_country_code: "US".to_string(),
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn ad_filter_builds_with_borrowed_inputs() {
    let search = String::from("fitness");
    let filter = AdFilter {
        search: Some(&search),
        country_code: Some("US"),
        quality_tier: Some("gold"),
        min_days_running: Some(7),
        sort_by: AdSort::Performance,
        sort_order: SortOrder::Desc,
        limit: 20,
        offset: 40,
        ..AdFilter::default()
    };

    assert_eq!(filter.search, Some("fitness"));
    assert_eq!(filter.quality_tier, Some("gold"));
    assert_eq!(filter.limit, 20);
}

/// Compile-time smoke test: confirm [`TierMetrics`] has all expected
/// fields. No database required.
#[test]
fn tier_metrics_has_expected_fields() {
    let metrics = TierMetrics {
        total_ads: 10,
        gold_ads: 2,
        silver_ads: 3,
        bronze_ads: 5,
    };

    assert_eq!(
        metrics.gold_ads + metrics.silver_ads + metrics.bronze_ads,
        metrics.total_ads
    );
}
