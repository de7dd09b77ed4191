use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::responses::{
    DiscontinuedResponse, HealthResponse, ModelResponse, YearRangeResponse,
};
use crate::api::state::AppState;
use crate::config::Settings;
use crate::domain::model::{ProbeStatus, StatisticsResult};
use crate::utils::error::{ApiError, Result};
use crate::utils::validation::{
    validate_max_span, validate_min_discontinuation_span, validate_year, validate_year_order,
};

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl RangeParams {
    /// 兩個參數都必填
    fn required(self) -> Result<(i32, i32)> {
        let start_year = self
            .start_year
            .ok_or_else(|| ApiError::validation("start_year is required"))?;
        let end_year = self
            .end_year
            .ok_or_else(|| ApiError::validation("end_year is required"))?;
        Ok((start_year, end_year))
    }
}

fn range_params(params: std::result::Result<Query<RangeParams>, QueryRejection>) -> Result<RangeParams> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::validation(rejection.body_text()))
}

/// 共用的區間驗證：年份上下限、先後順序、最大跨度
fn validate_range_request(settings: &Settings, start_year: i32, end_year: i32) -> Result<()> {
    validate_year("start_year", start_year, settings.min_year, settings.max_year)?;
    validate_year("end_year", end_year, settings.min_year, settings.max_year)?;
    validate_year_order(start_year, end_year)?;
    validate_max_span(start_year, end_year, settings.max_year_range)
}

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let settings = &state.settings;

    Json(json!({
        "message": settings.project_name,
        "version": settings.version,
        "description": settings.project_description,
        "endpoints": {
            "GET /models/{year}": format!("Get {} models for a specific year", settings.make),
            "GET /models/range": format!("Get {} models for a year range", settings.make),
            "GET /models/discontinued": format!("Find discontinued {} models", settings.make),
            "GET /models/statistics": "Get comprehensive statistics",
            "GET /health": "Health check endpoint"
        },
        "data_source": "NHTSA Vehicle Database"
    }))
}

pub async fn get_models_for_year(
    State(state): State<AppState>,
    year: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<ModelResponse>> {
    let Path(year) = year.map_err(|rejection| ApiError::validation(rejection.body_text()))?;
    validate_year("Year", year, state.settings.min_year, state.settings.max_year)?;

    let models = state.aggregator.fetch_models(year).await?;
    tracing::info!("📋 {} models found for {}", models.len(), year);

    Ok(Json(ModelResponse::new(year, models)))
}

pub async fn get_models_for_range(
    State(state): State<AppState>,
    params: std::result::Result<Query<RangeParams>, QueryRejection>,
) -> Result<Json<YearRangeResponse>> {
    let (start_year, end_year) = range_params(params)?.required()?;
    validate_range_request(&state.settings, start_year, end_year)?;

    let yearly_models = state.aggregator.fetch_range(start_year, end_year).await?;
    let response = YearRangeResponse::new(start_year, end_year, yearly_models);
    tracing::info!(
        "📋 {} unique models across {}-{}",
        response.total_unique_models,
        start_year,
        end_year
    );

    Ok(Json(response))
}

pub async fn get_discontinued_models(
    State(state): State<AppState>,
    params: std::result::Result<Query<RangeParams>, QueryRejection>,
) -> Result<Json<DiscontinuedResponse>> {
    let (start_year, end_year) = range_params(params)?.required()?;
    let settings = &state.settings;

    validate_year("start_year", start_year, settings.min_year, settings.max_year)?;
    validate_year("end_year", end_year, settings.min_year, settings.max_year)?;
    validate_year_order(start_year, end_year)?;
    validate_min_discontinuation_span(start_year, end_year, settings.min_discontinuation_range)?;
    validate_max_span(start_year, end_year, settings.max_year_range)?;

    let result = state.aggregator.find_discontinued(start_year, end_year).await?;
    let discontinued_models: Vec<String> = result.discontinued_models.into_iter().collect();

    Ok(Json(DiscontinuedResponse {
        start_year,
        end_year,
        early_years_models_count: result.early_years_models.len(),
        recent_years_models_count: result.recent_years_models.len(),
        discontinued_count: discontinued_models.len(),
        discontinued_models,
    }))
}

pub async fn get_models_statistics(
    State(state): State<AppState>,
    params: std::result::Result<Query<RangeParams>, QueryRejection>,
) -> Result<Json<StatisticsResult>> {
    let params = range_params(params)?;
    let start_year = params
        .start_year
        .unwrap_or(state.settings.statistics_default_start);
    let end_year = params.end_year.unwrap_or(state.settings.statistics_default_end);
    validate_range_request(&state.settings, start_year, end_year)?;

    let statistics = state.aggregator.summarize(start_year, end_year).await?;
    tracing::info!(
        "📊 Statistics {}: {} unique models, peak {} ({})",
        statistics.analysis_period,
        statistics.total_unique_models,
        statistics.peak_year.year,
        statistics.peak_year.model_count
    );

    Ok(Json(statistics))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let probe = state.aggregator.probe().await;
    let status = match probe.status {
        ProbeStatus::Healthy => "healthy",
        ProbeStatus::Degraded => "degraded",
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: chrono::Local::now().to_rfc3339(),
        api_connectivity: probe.api_connectivity,
        test_query_result: probe.test_query_result,
        error: probe.error,
    })
}

pub async fn fallback() -> impl IntoResponse {
    crate::api::responses::not_found()
}
