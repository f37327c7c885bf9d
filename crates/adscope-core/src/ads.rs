//! Canonical ad entity shared across the pipeline, storage, and API crates.

use std::future::Future;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse quality classification derived from the score thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Gold,
    Silver,
    Bronze,
}

impl QualityTier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::Gold => "gold",
            QualityTier::Silver => "silver",
            QualityTier::Bronze => "bronze",
        }
    }
}

impl std::str::FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gold" => Ok(QualityTier::Gold),
            "silver" => Ok(QualityTier::Silver),
            "bronze" => Ok(QualityTier::Bronze),
            other => Err(format!("unknown quality tier: {other}")),
        }
    }
}

/// Creative format of a stored ad.
///
/// `Carousel` is a valid stored value but the classifier only ever infers
/// `Image` or `Video` from the source media-type hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Carousel,
}

impl MediaType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Carousel => "carousel",
        }
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            "carousel" => Ok(MediaType::Carousel),
            other => Err(format!("unknown media type: {other}")),
        }
    }
}

/// A raw ad-library record normalized into the canonical entity shape.
///
/// Produced by the classifier's transform step inside a collection run and
/// persisted by upsert keyed on [`NormalizedAd::ad_library_id`]. View-count
/// increments and validation happen later, against the stored row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedAd {
    /// External ad-library identifier; the unique upsert key.
    pub ad_library_id: String,
    pub title: String,
    pub description: Option<String>,
    pub headline: Option<String>,
    pub call_to_action: Option<String>,
    pub media_type: MediaType,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub landing_page_url: Option<String>,
    /// ISO 3166-1 alpha-2 code. See `DESIGN.md` for the assignment strategy.
    pub country_code: String,
    pub country_name: Option<String>,
    pub language_code: Option<String>,
    pub estimated_daily_spend: Option<Decimal>,
    /// Whole days between delivery start and stop (or now), ceiling-rounded.
    pub days_running: i32,
    pub estimated_total_spend: Option<Decimal>,
    /// Quality score clamped to `[1, 100]`.
    pub performance_score: i16,
    pub engagement_rate: Option<Decimal>,
    pub quality_tier: QualityTier,
    pub is_validated: bool,
    pub is_active: bool,
    pub first_seen_date: DateTime<Utc>,
    pub last_seen_date: DateTime<Utc>,
}

/// Persistence collaborator consumed by the scraper orchestrator.
///
/// `upsert_ad` has insert-or-update semantics keyed on the external ad
/// identifier: resubmitting the same id must update the stored record
/// in place, never raise a duplicate-key error.
pub trait AdStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Inserts or updates the ad, returning the stored row's internal id.
    fn upsert_ad(
        &self,
        ad: &NormalizedAd,
    ) -> impl Future<Output = Result<Uuid, Self::Error>> + Send;
}
