use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::middleware::RequestId;
use crate::scraper::ScraperStatus;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use adscope_db::PgAdStore;
use adscope_pipeline::RunResult;

#[derive(Debug, Deserialize, Default)]
pub(super) struct RunRequest {
    pub search_terms: Option<String>,
    pub countries: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RunByCountryRequest {
    pub countries: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RunBySearchQuery {
    pub term: String,
}

/// Claims the run guard and drives one collection run. A run already in
/// progress yields a conflict, never a queued or concurrent run.
async fn trigger_run(
    state: &AppState,
    req_id: &str,
    search_terms: Option<String>,
    countries: Option<Vec<String>>,
) -> Result<RunResult, ApiError> {
    let Some(_guard) = state.scraper.try_begin_run() else {
        return Err(ApiError::new(
            req_id.to_owned(),
            "conflict",
            "a collection run is already in progress",
        ));
    };

    let store = PgAdStore::new(state.pool.clone());
    let options = state.scraper.run_options(search_terms, countries);
    Ok(state.scraper.run(&store, &options).await)
}

pub(super) async fn run(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Option<Json<RunRequest>>,
) -> Result<Json<ApiResponse<RunResult>>, ApiError> {
    let Json(request) = body.unwrap_or_default();
    let result = trigger_run(&state, &req_id.0, request.search_terms, request.countries).await?;

    Ok(Json(ApiResponse {
        data: result,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn run_by_country(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<RunByCountryRequest>,
) -> Result<Json<ApiResponse<RunResult>>, ApiError> {
    if request.countries.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "countries must not be empty",
        ));
    }

    let result = trigger_run(&state, &req_id.0, None, Some(request.countries)).await?;

    Ok(Json(ApiResponse {
        data: result,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn run_by_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RunBySearchQuery>,
) -> Result<Json<ApiResponse<RunResult>>, ApiError> {
    if query.term.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "term must not be empty",
        ));
    }

    let result = trigger_run(&state, &req_id.0, Some(query.term), None).await?;

    Ok(Json(ApiResponse {
        data: result,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ScraperStatus>> {
    Json(ApiResponse {
        data: state.scraper.status().await,
        meta: ResponseMeta::new(req_id.0),
    })
}
