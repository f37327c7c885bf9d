//! Normalization of accepted raw records into the canonical entity.

use adscope_core::{MediaType, NormalizedAd};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::classifier::{
    average_bound, days_running, infer_media_type, parse_wire_timestamp, score_record,
};
use crate::types::ClassifierConfig;
use adscope_adlibrary::types::RawAdRecord;

const TITLE_MAX_CHARS: usize = 200;

/// Maps an accepted raw record into a [`NormalizedAd`].
///
/// `country_code` is the code to stamp on the entity — the queried country
/// for single-country runs, the configured default otherwise. This function
/// never fails: malformed numeric bounds leave the spend fields unset.
#[must_use]
pub fn transform_record(
    record: &RawAdRecord,
    config: &ClassifierConfig,
    country_code: &str,
    now: DateTime<Utc>,
) -> NormalizedAd {
    let days = days_running(record, now);
    let assessment = score_record(record, days, config);

    let media_type = infer_media_type(record.media_type.as_deref());
    let snapshot = record.ad_snapshot_url.clone();

    let daily_spend = average_bound(record.spend.as_ref())
        .and_then(Decimal::from_f64_retain)
        .map(|d| d.round_dp(2));
    let total_spend = daily_spend.map(|daily| daily * Decimal::from(days));

    let first_seen = record
        .ad_delivery_start_time
        .as_deref()
        .and_then(parse_wire_timestamp)
        .unwrap_or(now);

    NormalizedAd {
        ad_library_id: record.id.clone(),
        title: extract_title(record),
        description: extract_description(record),
        headline: record.ad_creative_link_titles.first().cloned(),
        call_to_action: record.ad_creative_link_captions.first().cloned(),
        media_type,
        image_url: (media_type == MediaType::Image).then(|| snapshot.clone()).flatten(),
        video_url: (media_type == MediaType::Video).then(|| snapshot.clone()).flatten(),
        thumbnail_url: snapshot.clone(),
        landing_page_url: snapshot,
        country_code: country_code.to_owned(),
        country_name: None,
        language_code: record
            .languages
            .first()
            .cloned()
            .or_else(|| Some("en".to_owned())),
        estimated_daily_spend: daily_spend,
        days_running: i32::try_from(days).unwrap_or(i32::MAX),
        estimated_total_spend: total_spend,
        performance_score: clamp_performance_score(assessment.score),
        engagement_rate: None,
        quality_tier: assessment.tier,
        is_validated: false,
        is_active: true,
        first_seen_date: first_seen,
        last_seen_date: now,
    }
}

/// Title preference: link title, then the first creative body, both
/// truncated, then a placeholder synthesized from the page name or id.
fn extract_title(record: &RawAdRecord) -> String {
    if let Some(title) = record.ad_creative_link_titles.first() {
        return truncate_chars(title, TITLE_MAX_CHARS);
    }
    if let Some(body) = record.ad_creative_bodies.first() {
        return truncate_chars(body, TITLE_MAX_CHARS);
    }
    let label = record.page_name.as_deref().unwrap_or(&record.id);
    format!("Ad {label}")
}

fn extract_description(record: &RawAdRecord) -> Option<String> {
    record
        .ad_creative_bodies
        .first()
        .or_else(|| record.ad_creative_link_descriptions.first())
        .cloned()
}

/// Char-boundary-safe truncation (byte slicing would panic mid-codepoint).
fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// The stored score is bounded `[1, 100]`; the raw accumulator is not.
fn clamp_performance_score(score: u32) -> i16 {
    i16::try_from(score.clamp(1, 100)).unwrap_or(100)
}
