//! Deterministic quality classification of raw ad records.
//!
//! Scoring is a pure function of the record and its computed days-running:
//! identical inputs always yield the identical score and tier. Points are
//! additive per factor; the days-running factor is bucketed, not
//! cumulative. Thresholds come from [`ClassifierConfig`] on every call.

use adscope_core::{MediaType, QualityTier};
use chrono::{DateTime, NaiveDate, Utc};

use crate::types::{ClassifierConfig, QualityAssessment};
use adscope_adlibrary::types::{BoundRange, RawAdRecord};

/// Parses a delivery timestamp as sent by the ad library.
///
/// The wire format is `2026-07-01T00:00:00+0000`; RFC 3339 and bare dates
/// are accepted as well since the endpoint is not consistent about it.
pub(crate) fn parse_wire_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// Whole days between delivery start and stop (or `now` while still
/// delivering), ceiling-rounded. `0` when the start time is missing or
/// unparseable.
#[must_use]
pub fn days_running(record: &RawAdRecord, now: DateTime<Utc>) -> i64 {
    let Some(start) = record
        .ad_delivery_start_time
        .as_deref()
        .and_then(parse_wire_timestamp)
    else {
        return 0;
    };
    let end = record
        .ad_delivery_stop_time
        .as_deref()
        .and_then(parse_wire_timestamp)
        .unwrap_or(now);

    let seconds = (end - start).num_seconds().abs();
    (seconds as u64).div_ceil(86_400) as i64
}

/// Mean of the two bounds when both are present and parse as numbers;
/// malformed bounds degrade to `None`, never an error.
pub(crate) fn average_bound(range: Option<&BoundRange>) -> Option<f64> {
    let range = range?;
    let lower: f64 = range.lower_bound.as_deref()?.parse().ok()?;
    let upper: f64 = range.upper_bound.as_deref()?.parse().ok()?;
    if lower.is_nan() || upper.is_nan() {
        return None;
    }
    Some((lower + upper) / 2.0)
}

/// Media type inferred from the source hint: anything containing `video`
/// (case-insensitive) is a video, everything else an image. The classifier
/// never infers `carousel`.
pub(crate) fn infer_media_type(hint: Option<&str>) -> MediaType {
    match hint {
        Some(h) if h.to_lowercase().contains("video") => MediaType::Video,
        _ => MediaType::Image,
    }
}

/// Scores one record. Factors are evaluated independently and their points
/// added; only the days-running factor is bucketed (highest bucket wins).
#[must_use]
pub fn score_record(
    record: &RawAdRecord,
    days_running: i64,
    config: &ClassifierConfig,
) -> QualityAssessment {
    let mut score = 0u32;
    let mut reasons = Vec::new();

    if days_running >= 7 {
        score += 30;
        reasons.push("running 7+ days".to_owned());
    } else if days_running >= 5 {
        score += 20;
        reasons.push("running 5+ days".to_owned());
    } else if days_running >= 4 {
        score += 10;
        reasons.push("running 4+ days".to_owned());
    }

    if let Some(body) = record.ad_creative_bodies.first() {
        let len = body.chars().count();
        if (50..=1000).contains(&len) {
            score += 15;
            reasons.push("well-formed body text".to_owned());
        }
    }

    if !record.ad_creative_link_titles.is_empty() {
        score += 10;
        reasons.push("has link title".to_owned());
    }

    if !record.ad_creative_link_descriptions.is_empty() {
        score += 10;
        reasons.push("has link description".to_owned());
    }

    // Video takes precedence; an image reference only counts without one.
    if infer_media_type(record.media_type.as_deref()) == MediaType::Video {
        score += 20;
        reasons.push("contains video".to_owned());
    } else if record.ad_snapshot_url.is_some() {
        score += 10;
        reasons.push("contains image".to_owned());
    }

    let platform_count = record.publisher_platforms.len();
    if platform_count >= 2 {
        score += 10;
        reasons.push(format!("served on {platform_count} platforms"));
    }

    if let Some(avg_spend) = average_bound(record.spend.as_ref()) {
        if avg_spend >= 100.0 {
            score += 15;
            reasons.push("high estimated spend".to_owned());
        } else if avg_spend >= 50.0 {
            score += 10;
            reasons.push("medium estimated spend".to_owned());
        }
    }

    if let Some(avg_impressions) = average_bound(record.impressions.as_ref()) {
        if avg_impressions >= 10_000.0 {
            score += 10;
            reasons.push("high impression count".to_owned());
        }
    }

    let tier = if score >= config.gold_score_threshold {
        QualityTier::Gold
    } else if score >= config.silver_score_threshold {
        QualityTier::Silver
    } else {
        QualityTier::Bronze
    };

    QualityAssessment {
        score,
        tier,
        reasons,
    }
}

/// Keeps only records satisfying all baseline acceptance criteria:
/// days-running at or above the configured minimum, at least one non-empty
/// creative body, and a snapshot reference. Rejected records are dropped
/// silently.
#[must_use]
pub fn filter_records(
    records: Vec<RawAdRecord>,
    config: &ClassifierConfig,
    now: DateTime<Utc>,
) -> Vec<RawAdRecord> {
    records
        .into_iter()
        .filter(|record| {
            if days_running(record, now) < config.min_days_running {
                return false;
            }
            if !record.ad_creative_bodies.iter().any(|b| !b.is_empty()) {
                return false;
            }
            record.ad_snapshot_url.is_some()
        })
        .collect()
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;
