//! Integration tests for `AdLibraryClient` using wiremock HTTP mocks.

use std::time::Duration;

use adscope_adlibrary::client::{AdLibraryClient, ClientConfig};
use adscope_adlibrary::error::AdLibraryError;
use adscope_adlibrary::retry::{Backoff, RetryPolicy};
use adscope_adlibrary::types::SearchParams;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn zero_delay_policy() -> RetryPolicy {
    RetryPolicy {
        rate_limited: Backoff {
            max_retries: 2,
            delay: Duration::ZERO,
        },
        server_error: Backoff {
            max_retries: 3,
            delay: Duration::ZERO,
        },
    }
}

fn test_client(base_url: &str) -> AdLibraryClient {
    AdLibraryClient::new(&ClientConfig {
        base_url: base_url.to_owned(),
        access_token: "test-token".to_owned(),
        timeout_secs: 30,
        requests_per_hour: 1000,
        request_delay_ms: 0,
        min_days_running: 4,
    })
    .expect("client construction should not fail")
    .with_retry_policy(zero_delay_policy())
}

fn page_body(ids: &[&str], after: Option<&str>) -> serde_json::Value {
    let data: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "ad_creative_bodies": ["Sample creative body text"],
                "ad_delivery_start_time": "2026-07-01T00:00:00+0000",
                "ad_snapshot_url": format!("https://example.test/snapshot/{id}"),
            })
        })
        .collect();

    match after {
        Some(cursor) => serde_json::json!({
            "data": data,
            "paging": {
                "cursors": { "before": "b", "after": cursor },
                "next": "https://example.test/next"
            }
        }),
        None => serde_json::json!({ "data": data }),
    }
}

#[tokio::test]
async fn search_follows_pagination_cursor_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ads_archive"))
        .and(query_param_is_missing("after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["1", "2"], Some("c2"))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ads_archive"))
        .and(query_param("after", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["3"], None)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = client
        .search(&SearchParams::default(), 5)
        .await
        .expect("search should succeed");

    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.records.len(), 3);
    assert!(outcome.page_error.is_none());
    let ids: Vec<&str> = outcome.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn search_stops_at_max_pages_even_with_more_cursors() {
    let server = MockServer::start().await;

    // Every page advertises another cursor; the page cap must stop the loop.
    Mock::given(method("GET"))
        .and(path("/ads_archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["1"], Some("more"))))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = client
        .search(&SearchParams::default(), 3)
        .await
        .expect("search should succeed");

    assert_eq!(outcome.pages_fetched, 3);
    assert_eq!(outcome.records.len(), 3);
}

#[tokio::test]
async fn transient_server_errors_are_retried_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ads_archive"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ads_archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["1"], None)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = client
        .search(&SearchParams::default(), 1)
        .await
        .expect("search should succeed after retries");

    assert_eq!(outcome.records.len(), 1);
    assert!(
        outcome.page_error.is_none(),
        "retried-then-successful page must not surface an error"
    );
}

#[tokio::test]
async fn exhausted_rate_limit_retries_degrade_to_a_page_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ads_archive"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3) // 1 initial attempt + 2 retries
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = client
        .search(&SearchParams::default(), 3)
        .await
        .expect("rate-limit exhaustion is a page failure, not a run failure");

    assert_eq!(outcome.pages_fetched, 0);
    assert!(outcome.records.is_empty());
    let err = outcome.page_error.expect("page error should be recorded");
    assert!(err.contains("page 1"), "unexpected error: {err}");
}

#[tokio::test]
async fn auth_rejection_fails_the_fetch_phase_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ads_archive"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "message": "Invalid OAuth access token.", "type": "OAuthException" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.search(&SearchParams::default(), 3).await;

    match result {
        Err(AdLibraryError::Rejected { status, message }) => {
            assert_eq!(status, 401);
            assert!(message.contains("Invalid OAuth access token"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn mid_pagination_failure_preserves_earlier_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ads_archive"))
        .and(query_param_is_missing("after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["1", "2"], Some("c2"))))
        .mount(&server)
        .await;

    // Second page never recovers.
    Mock::given(method("GET"))
        .and(path("/ads_archive"))
        .and(query_param("after", "c2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = client
        .search(&SearchParams::default(), 5)
        .await
        .expect("partial results expected");

    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.records.len(), 2, "first page records preserved");
    assert!(outcome.page_error.is_some());
}

#[tokio::test]
async fn quota_telemetry_header_is_tolerated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ads_archive"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(&["1"], None))
                .insert_header(
                    "x-app-usage",
                    r#"{"call_count":95,"total_cputime":12,"total_time":40}"#,
                ),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = client
        .search(&SearchParams::default(), 1)
        .await
        .expect("telemetry must not alter behavior");

    assert_eq!(outcome.records.len(), 1);
}
