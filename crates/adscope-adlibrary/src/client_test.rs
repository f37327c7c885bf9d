use super::*;
use crate::types::ActiveStatus;

fn test_config(base_url: &str) -> ClientConfig {
    ClientConfig {
        base_url: base_url.to_owned(),
        access_token: "test-token".to_owned(),
        timeout_secs: 30,
        requests_per_hour: 200,
        request_delay_ms: 0,
        min_days_running: 4,
    }
}

fn test_client(base_url: &str) -> AdLibraryClient {
    AdLibraryClient::new(&test_config(base_url)).expect("client construction should not fail")
}

fn base_params() -> SearchParams {
    SearchParams {
        reached_countries: vec!["US".to_owned(), "GB".to_owned()],
        ..SearchParams::default()
    }
}

#[test]
fn build_url_targets_the_archive_endpoint() {
    let client = test_client("https://graph.example.test/v21.0");
    let url = client.build_search_url(&base_params(), None);
    assert_eq!(url.path(), "/v21.0/ads_archive");
}

#[test]
fn build_url_strips_trailing_slash() {
    let client = test_client("https://graph.example.test/v21.0/");
    let url = client.build_search_url(&base_params(), None);
    assert_eq!(url.path(), "/v21.0/ads_archive");
}

#[test]
fn build_url_includes_required_parameters() {
    let client = test_client("https://graph.example.test/v21.0");
    let url = client.build_search_url(&base_params(), None);
    let query: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let get = |key: &str| {
        query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    assert_eq!(get("access_token"), Some("test-token"));
    assert_eq!(get("ad_active_status"), Some("ACTIVE"));
    assert_eq!(get("ad_reached_countries"), Some(r#"["US","GB"]"#));
    assert_eq!(get("limit"), Some("100"));
    assert!(get("fields").unwrap().contains("ad_creative_bodies"));
    assert!(get("fields").unwrap().contains("impressions"));
    assert!(get("after").is_none());
    assert!(get("search_terms").is_none());
}

#[test]
fn build_url_derives_min_delivery_date_from_config() {
    let client = test_client("https://graph.example.test/v21.0");
    let url = client.build_search_url(&base_params(), None);
    let min_date = url
        .query_pairs()
        .find(|(k, _)| k == "ad_delivery_date_min")
        .map(|(_, v)| v.into_owned())
        .expect("ad_delivery_date_min should be present");

    let expected = (chrono::Utc::now() - chrono::Duration::days(4))
        .format("%Y-%m-%d")
        .to_string();
    assert_eq!(min_date, expected);
}

#[test]
fn build_url_honours_explicit_min_delivery_date() {
    let client = test_client("https://graph.example.test/v21.0");
    let params = SearchParams {
        delivery_date_min: Some("2026-01-01".to_owned()),
        ..base_params()
    };
    let url = client.build_search_url(&params, None);
    assert!(url
        .query_pairs()
        .any(|(k, v)| k == "ad_delivery_date_min" && v == "2026-01-01"));
}

#[test]
fn build_url_includes_optional_parameters_when_set() {
    let client = test_client("https://graph.example.test/v21.0");
    let params = SearchParams {
        active_status: ActiveStatus::All,
        search_terms: Some("fitness coaching".to_owned()),
        media_type: Some("VIDEO".to_owned()),
        publisher_platforms: Some(vec!["facebook".to_owned(), "instagram".to_owned()]),
        languages: Some(vec!["en".to_owned()]),
        ..base_params()
    };
    let url = client.build_search_url(&params, Some("cursor-1"));
    let rendered = url.as_str();

    assert!(rendered.contains("ad_active_status=ALL"));
    assert!(
        rendered.contains("search_terms=fitness+coaching")
            || rendered.contains("search_terms=fitness%20coaching"),
        "search terms should be percent-encoded: {rendered}"
    );
    assert!(rendered.contains("media_type=VIDEO"));
    assert!(url
        .query_pairs()
        .any(|(k, v)| k == "publisher_platforms" && v == r#"["facebook","instagram"]"#));
    assert!(url.query_pairs().any(|(k, v)| k == "languages" && v == r#"["en"]"#));
    assert!(url.query_pairs().any(|(k, v)| k == "after" && v == "cursor-1"));
}

#[test]
fn extract_error_message_reads_the_error_envelope() {
    let body = r#"{"error":{"message":"Invalid OAuth access token.","type":"OAuthException"}}"#;
    assert_eq!(extract_error_message(body), "Invalid OAuth access token.");
}

#[test]
fn extract_error_message_falls_back_to_raw_body() {
    assert_eq!(extract_error_message("boom"), "boom");
}

#[test]
fn invalid_base_url_is_rejected_at_construction() {
    let result = AdLibraryClient::new(&test_config("not a url"));
    assert!(matches!(result, Err(AdLibraryError::Rejected { .. })));
}
