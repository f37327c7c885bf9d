//! Database operations for the `ads` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;
use adscope_core::NormalizedAd;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `ads` table.
///
/// `quality_tier` and `media_type` are stored as TEXT with CHECK
/// constraints; parse into the core enums at the edge when needed.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdRow {
    pub id: Uuid,
    /// External ad-library identifier; unique, the upsert key.
    pub ad_library_id: String,
    pub title: String,
    pub description: Option<String>,
    pub headline: Option<String>,
    pub call_to_action: Option<String>,
    pub media_type: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub landing_page_url: Option<String>,
    pub country_code: String,
    pub country_name: Option<String>,
    pub language_code: Option<String>,
    pub estimated_daily_spend: Option<Decimal>,
    pub days_running: Option<i32>,
    pub estimated_total_spend: Option<Decimal>,
    /// `CHECK (performance_score BETWEEN 1 AND 100)` in the schema.
    pub performance_score: Option<i16>,
    pub engagement_rate: Option<Decimal>,
    pub quality_tier: String,
    pub is_validated: bool,
    pub validated_by: Option<String>,
    pub validated_at: Option<DateTime<Utc>>,
    pub validation_notes: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    /// Monotonically non-decreasing; only ever incremented.
    pub views_count: i32,
    pub favorites_count: i32,
    pub first_seen_date: Option<DateTime<Utc>>,
    pub last_seen_date: Option<DateTime<Utc>>,
    pub scraped_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tier distribution counts for the metrics endpoint.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TierMetrics {
    pub total_ads: i64,
    pub gold_ads: i64,
    pub silver_ads: i64,
    pub bronze_ads: i64,
}

const AD_COLUMNS: &str = "id, ad_library_id, title, description, headline, call_to_action, \
     media_type, image_url, video_url, thumbnail_url, landing_page_url, \
     country_code, country_name, language_code, estimated_daily_spend, \
     days_running, estimated_total_spend, performance_score, engagement_rate, \
     quality_tier, is_validated, validated_by, validated_at, validation_notes, \
     is_active, is_featured, views_count, favorites_count, first_seen_date, \
     last_seen_date, scraped_at, created_at, updated_at";

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Sort key for [`list_ads`], mapped to a whitelisted column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdSort {
    #[default]
    CreatedAt,
    Views,
    Favorites,
    Performance,
    DaysRunning,
}

impl AdSort {
    fn column(self) -> &'static str {
        match self {
            AdSort::CreatedAt => "created_at",
            AdSort::Views => "views_count",
            AdSort::Favorites => "favorites_count",
            AdSort::Performance => "performance_score",
            AdSort::DaysRunning => "days_running",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Input filters for the ad listing. Only active ads are ever returned.
#[derive(Debug, Clone, Default)]
pub struct AdFilter<'a> {
    /// Free-text match against title, description, and headline.
    pub search: Option<&'a str>,
    pub country_code: Option<&'a str>,
    pub quality_tier: Option<&'a str>,
    pub media_type: Option<&'a str>,
    pub is_featured: Option<bool>,
    pub is_validated: Option<bool>,
    pub min_days_running: Option<i32>,
    pub min_performance_score: Option<i16>,
    pub sort_by: AdSort,
    pub sort_order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

const AD_FILTER_WHERE: &str = "WHERE is_active = TRUE \
       AND ($1::TEXT IS NULL \
            OR title ILIKE '%' || $1 || '%' \
            OR description ILIKE '%' || $1 || '%' \
            OR headline ILIKE '%' || $1 || '%') \
       AND ($2::TEXT IS NULL OR country_code = $2) \
       AND ($3::TEXT IS NULL OR quality_tier = $3) \
       AND ($4::TEXT IS NULL OR media_type = $4) \
       AND ($5::BOOLEAN IS NULL OR is_featured = $5) \
       AND ($6::BOOLEAN IS NULL OR is_validated = $6) \
       AND ($7::INTEGER IS NULL OR days_running >= $7) \
       AND ($8::SMALLINT IS NULL OR performance_score >= $8)";

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Inserts or updates an ad, keyed on `ad_library_id`.
///
/// On conflict the creative, scoring, and last-seen fields are refreshed;
/// engagement counters, validation state, and `first_seen_date` belong to
/// the stored row's own lifecycle and are left untouched. Returns the full
/// stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_ad(pool: &PgPool, ad: &NormalizedAd) -> Result<AdRow, DbError> {
    let row = sqlx::query_as::<_, AdRow>(&format!(
        "INSERT INTO ads \
             (ad_library_id, title, description, headline, call_to_action, \
              media_type, image_url, video_url, thumbnail_url, landing_page_url, \
              country_code, country_name, language_code, estimated_daily_spend, \
              days_running, estimated_total_spend, performance_score, \
              engagement_rate, quality_tier, is_validated, is_active, \
              first_seen_date, last_seen_date) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
                 $15, $16, $17, $18, $19, $20, $21, $22, $23) \
         ON CONFLICT (ad_library_id) DO UPDATE SET \
             title                 = EXCLUDED.title, \
             description           = EXCLUDED.description, \
             headline              = EXCLUDED.headline, \
             call_to_action        = EXCLUDED.call_to_action, \
             media_type            = EXCLUDED.media_type, \
             image_url             = EXCLUDED.image_url, \
             video_url             = EXCLUDED.video_url, \
             thumbnail_url         = EXCLUDED.thumbnail_url, \
             landing_page_url      = EXCLUDED.landing_page_url, \
             country_code          = EXCLUDED.country_code, \
             language_code         = EXCLUDED.language_code, \
             estimated_daily_spend = EXCLUDED.estimated_daily_spend, \
             days_running          = EXCLUDED.days_running, \
             estimated_total_spend = EXCLUDED.estimated_total_spend, \
             performance_score     = EXCLUDED.performance_score, \
             quality_tier          = EXCLUDED.quality_tier, \
             is_active             = EXCLUDED.is_active, \
             last_seen_date        = EXCLUDED.last_seen_date, \
             scraped_at            = NOW(), \
             updated_at            = NOW() \
         RETURNING {AD_COLUMNS}"
    ))
    .bind(&ad.ad_library_id)
    .bind(&ad.title)
    .bind(&ad.description)
    .bind(&ad.headline)
    .bind(&ad.call_to_action)
    .bind(ad.media_type.as_str())
    .bind(&ad.image_url)
    .bind(&ad.video_url)
    .bind(&ad.thumbnail_url)
    .bind(&ad.landing_page_url)
    .bind(&ad.country_code)
    .bind(&ad.country_name)
    .bind(&ad.language_code)
    .bind(ad.estimated_daily_spend)
    .bind(ad.days_running)
    .bind(ad.estimated_total_spend)
    .bind(ad.performance_score)
    .bind(ad.engagement_rate)
    .bind(ad.quality_tier.as_str())
    .bind(ad.is_validated)
    .bind(ad.is_active)
    .bind(ad.first_seen_date)
    .bind(ad.last_seen_date)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns a filtered, sorted, paginated page of ads plus the total match
/// count (before pagination).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn list_ads(
    pool: &PgPool,
    filter: &AdFilter<'_>,
) -> Result<(Vec<AdRow>, i64), DbError> {
    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM ads {AD_FILTER_WHERE}"))
        .bind(filter.search)
        .bind(filter.country_code)
        .bind(filter.quality_tier)
        .bind(filter.media_type)
        .bind(filter.is_featured)
        .bind(filter.is_validated)
        .bind(filter.min_days_running)
        .bind(filter.min_performance_score)
        .fetch_one(pool)
        .await?;

    // Sort column and direction come from whitelisted enums, never input.
    let rows = sqlx::query_as::<_, AdRow>(&format!(
        "SELECT {AD_COLUMNS} FROM ads {AD_FILTER_WHERE} \
         ORDER BY {} {} NULLS LAST \
         LIMIT $9 OFFSET $10",
        filter.sort_by.column(),
        filter.sort_order.keyword(),
    ))
    .bind(filter.search)
    .bind(filter.country_code)
    .bind(filter.quality_tier)
    .bind(filter.media_type)
    .bind(filter.is_featured)
    .bind(filter.is_validated)
    .bind(filter.min_days_running)
    .bind(filter.min_performance_score)
    .bind(filter.limit)
    .bind(filter.offset)
    .fetch_all(pool)
    .await?;

    Ok((rows, total))
}

/// Fetches one ad by internal id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_ad(pool: &PgPool, id: Uuid) -> Result<Option<AdRow>, DbError> {
    let row = sqlx::query_as::<_, AdRow>(&format!(
        "SELECT {AD_COLUMNS} FROM ads WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Fetches one ad by its external ad-library identifier.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_by_ad_library_id(
    pool: &PgPool,
    ad_library_id: &str,
) -> Result<Option<AdRow>, DbError> {
    let row = sqlx::query_as::<_, AdRow>(&format!(
        "SELECT {AD_COLUMNS} FROM ads WHERE ad_library_id = $1"
    ))
    .bind(ad_library_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Increments the view counter by one.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no ad has that id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn increment_views(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE ads SET views_count = views_count + 1, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Marks an ad as validated by an operator.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no ad has that id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn validate_ad(
    pool: &PgPool,
    id: Uuid,
    validated_by: &str,
    notes: Option<&str>,
) -> Result<AdRow, DbError> {
    let row = sqlx::query_as::<_, AdRow>(&format!(
        "UPDATE ads SET \
             is_validated     = TRUE, \
             validated_by     = $1, \
             validated_at     = NOW(), \
             validation_notes = $2, \
             updated_at       = NOW() \
         WHERE id = $3 \
         RETURNING {AD_COLUMNS}"
    ))
    .bind(validated_by)
    .bind(notes)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.ok_or(DbError::NotFound)
}

/// Tier distribution over all stored ads.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn tier_metrics(pool: &PgPool) -> Result<TierMetrics, DbError> {
    let metrics = sqlx::query_as::<_, TierMetrics>(
        "SELECT \
             COUNT(*)                                          AS total_ads, \
             COUNT(*) FILTER (WHERE quality_tier = 'gold')     AS gold_ads, \
             COUNT(*) FILTER (WHERE quality_tier = 'silver')   AS silver_ads, \
             COUNT(*) FILTER (WHERE quality_tier = 'bronze')   AS bronze_ads \
         FROM ads",
    )
    .fetch_one(pool)
    .await?;

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_keys_map_to_whitelisted_columns() {
        assert_eq!(AdSort::CreatedAt.column(), "created_at");
        assert_eq!(AdSort::Views.column(), "views_count");
        assert_eq!(AdSort::Favorites.column(), "favorites_count");
        assert_eq!(AdSort::Performance.column(), "performance_score");
        assert_eq!(AdSort::DaysRunning.column(), "days_running");
    }

    #[test]
    fn default_filter_sorts_newest_first() {
        let filter = AdFilter::default();
        assert_eq!(filter.sort_by, AdSort::CreatedAt);
        assert_eq!(filter.sort_order, SortOrder::Desc);
        assert!(filter.search.is_none());
    }

    /// Compile-time smoke test: confirm [`AdRow`] has all expected fields
    /// with the correct types. No database required.
    #[test]
    fn ad_row_has_expected_fields() {
        let now = Utc::now();
        let row = AdRow {
            id: Uuid::new_v4(),
            ad_library_id: "123".to_string(),
            title: "Summer Sale".to_string(),
            description: None,
            headline: None,
            call_to_action: None,
            media_type: "video".to_string(),
            image_url: None,
            video_url: Some("https://example.test/v".to_string()),
            thumbnail_url: None,
            landing_page_url: None,
            country_code: "US".to_string(),
            country_name: None,
            language_code: Some("en".to_string()),
            estimated_daily_spend: None,
            days_running: Some(10),
            estimated_total_spend: None,
            performance_score: Some(100),
            engagement_rate: None,
            quality_tier: "gold".to_string(),
            is_validated: false,
            validated_by: None,
            validated_at: None,
            validation_notes: None,
            is_active: true,
            is_featured: false,
            views_count: 0,
            favorites_count: 0,
            first_seen_date: Some(now),
            last_seen_date: Some(now),
            scraped_at: now,
            created_at: now,
            updated_at: now,
        };

        assert_eq!(row.ad_library_id, "123");
        assert_eq!(row.quality_tier, "gold");
        assert_eq!(row.views_count, 0);
    }
}
