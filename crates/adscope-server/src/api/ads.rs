use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};
use adscope_db::{AdFilter, AdRow, AdSort, SortOrder};

#[derive(Debug, Deserialize)]
pub(super) struct AdsQuery {
    pub search: Option<String>,
    pub country_code: Option<String>,
    pub quality_tier: Option<String>,
    pub media_type: Option<String>,
    pub is_featured: Option<bool>,
    pub is_validated: Option<bool>,
    pub min_days_running: Option<i32>,
    pub min_performance_score: Option<i16>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct AdItem {
    id: Uuid,
    ad_library_id: String,
    title: String,
    description: Option<String>,
    headline: Option<String>,
    call_to_action: Option<String>,
    media_type: String,
    image_url: Option<String>,
    video_url: Option<String>,
    thumbnail_url: Option<String>,
    landing_page_url: Option<String>,
    country_code: String,
    country_name: Option<String>,
    language_code: Option<String>,
    estimated_daily_spend: Option<Decimal>,
    days_running: Option<i32>,
    estimated_total_spend: Option<Decimal>,
    performance_score: Option<i16>,
    engagement_rate: Option<Decimal>,
    quality_tier: String,
    is_validated: bool,
    is_active: bool,
    is_featured: bool,
    views_count: i32,
    favorites_count: i32,
    first_seen_date: Option<DateTime<Utc>>,
    last_seen_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AdRow> for AdItem {
    fn from(row: AdRow) -> Self {
        Self {
            id: row.id,
            ad_library_id: row.ad_library_id,
            title: row.title,
            description: row.description,
            headline: row.headline,
            call_to_action: row.call_to_action,
            media_type: row.media_type,
            image_url: row.image_url,
            video_url: row.video_url,
            thumbnail_url: row.thumbnail_url,
            landing_page_url: row.landing_page_url,
            country_code: row.country_code,
            country_name: row.country_name,
            language_code: row.language_code,
            estimated_daily_spend: row.estimated_daily_spend,
            days_running: row.days_running,
            estimated_total_spend: row.estimated_total_spend,
            performance_score: row.performance_score,
            engagement_rate: row.engagement_rate,
            quality_tier: row.quality_tier,
            is_validated: row.is_validated,
            is_active: row.is_active,
            is_featured: row.is_featured,
            views_count: row.views_count,
            favorites_count: row.favorites_count,
            first_seen_date: row.first_seen_date,
            last_seen_date: row.last_seen_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct AdListData {
    items: Vec<AdItem>,
    total: i64,
}

fn parse_sort(raw: Option<&str>) -> AdSort {
    match raw {
        Some("views") => AdSort::Views,
        Some("favorites") => AdSort::Favorites,
        Some("performance") => AdSort::Performance,
        Some("days_running") => AdSort::DaysRunning,
        _ => AdSort::CreatedAt,
    }
}

fn parse_order(raw: Option<&str>) -> SortOrder {
    match raw {
        Some("asc") => SortOrder::Asc,
        _ => SortOrder::Desc,
    }
}

pub(super) async fn list_ads(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AdsQuery>,
) -> Result<Json<ApiResponse<AdListData>>, ApiError> {
    let limit = normalize_limit(query.limit);
    let page = query.page.unwrap_or(1).max(1);
    let offset = query.offset.unwrap_or((page - 1) * limit).max(0);

    let filter = AdFilter {
        search: query.search.as_deref(),
        country_code: query.country_code.as_deref(),
        quality_tier: query.quality_tier.as_deref(),
        media_type: query.media_type.as_deref(),
        is_featured: query.is_featured,
        is_validated: query.is_validated,
        min_days_running: query.min_days_running,
        min_performance_score: query.min_performance_score,
        sort_by: parse_sort(query.sort_by.as_deref()),
        sort_order: parse_order(query.sort_order.as_deref()),
        limit,
        offset,
    };

    let (rows, total) = adscope_db::list_ads(&state.pool, &filter)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: AdListData {
            items: rows.into_iter().map(AdItem::from).collect(),
            total,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_ad(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AdItem>>, ApiError> {
    let row = adscope_db::get_ad(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "ad not found"))?;

    Ok(Json(ApiResponse {
        data: AdItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn increment_views(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    adscope_db::increment_views(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0, &e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub(super) struct ValidateRequest {
    pub validated_by: String,
    pub notes: Option<String>,
}

pub(super) async fn validate_ad(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(body): Json<ValidateRequest>,
) -> Result<Json<ApiResponse<AdItem>>, ApiError> {
    if body.validated_by.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "validated_by must not be empty",
        ));
    }

    let row = adscope_db::validate_ad(&state.pool, id, &body.validated_by, body.notes.as_deref())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: AdItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Serialize)]
pub(super) struct TierMetricsData {
    total_ads: i64,
    gold_ads: i64,
    silver_ads: i64,
    bronze_ads: i64,
}

pub(super) async fn get_metrics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<TierMetricsData>>, ApiError> {
    let metrics = adscope_db::tier_metrics(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: TierMetricsData {
            total_ads: metrics.total_ads,
            gold_ads: metrics.gold_ads,
            silver_ads: metrics.silver_ads,
            bronze_ads: metrics.bronze_ads,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_parameters_parse_with_defaults() {
        assert_eq!(parse_sort(Some("views")), AdSort::Views);
        assert_eq!(parse_sort(Some("performance")), AdSort::Performance);
        assert_eq!(parse_sort(Some("bogus")), AdSort::CreatedAt);
        assert_eq!(parse_sort(None), AdSort::CreatedAt);
        assert_eq!(parse_order(Some("asc")), SortOrder::Asc);
        assert_eq!(parse_order(None), SortOrder::Desc);
    }

    #[test]
    fn ad_item_is_serializable() {
        let now = Utc::now();
        let item = AdItem {
            id: Uuid::new_v4(),
            ad_library_id: "123".to_string(),
            title: "Summer Sale".to_string(),
            description: None,
            headline: None,
            call_to_action: None,
            media_type: "video".to_string(),
            image_url: None,
            video_url: None,
            thumbnail_url: None,
            landing_page_url: None,
            country_code: "US".to_string(),
            country_name: None,
            language_code: Some("en".to_string()),
            estimated_daily_spend: None,
            days_running: Some(10),
            estimated_total_spend: None,
            performance_score: Some(95),
            engagement_rate: None,
            quality_tier: "gold".to_string(),
            is_validated: false,
            is_active: true,
            is_featured: false,
            views_count: 3,
            favorites_count: 0,
            first_seen_date: Some(now),
            last_seen_date: Some(now),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&item).expect("serialize ad item");
        assert!(json.contains("\"quality_tier\":\"gold\""));
        assert!(json.contains("\"performance_score\":95"));
    }
}
