use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::model::{ModelSet, YearlyModels};
use crate::utils::error::{ApiError, ErrorCategory};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    pub year: i32,
    pub models: Vec<String>,
    pub total_count: usize,
}

impl ModelResponse {
    pub fn new(year: i32, models: ModelSet) -> Self {
        let models: Vec<String> = models.into_iter().collect();
        Self {
            year,
            total_count: models.len(),
            models,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearRangeResponse {
    pub start_year: i32,
    pub end_year: i32,
    pub yearly_data: BTreeMap<i32, Vec<String>>,
    pub total_unique_models: usize,
}

impl YearRangeResponse {
    pub fn new(start_year: i32, end_year: i32, yearly_models: YearlyModels) -> Self {
        let total_unique_models = yearly_models
            .values()
            .flatten()
            .collect::<std::collections::BTreeSet<_>>()
            .len();

        let yearly_data = yearly_models
            .into_iter()
            .map(|(year, models)| (year, models.into_iter().collect()))
            .collect();

        Self {
            start_year,
            end_year,
            yearly_data,
            total_unique_models,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscontinuedResponse {
    pub start_year: i32,
    pub end_year: i32,
    pub early_years_models_count: usize,
    pub recent_years_models_count: usize,
    pub discontinued_models: Vec<String>,
    pub discontinued_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub api_connectivity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_query_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self.category() {
            ErrorCategory::Validation => tracing::debug!("Rejected request: {}", self),
            category => tracing::error!(
                "❌ Request failed: {} (Category: {:?}, Status: {})",
                self,
                category,
                status
            ),
        }

        let body = ErrorResponse {
            error: self.label().to_string(),
            detail: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not Found".to_string(),
            detail: "Not Found".to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(models: &[&str]) -> ModelSet {
        models.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn test_model_response_sorted_with_count() {
        let response = ModelResponse::new(2016, set(&["Pilot", "Accord", "CR-V", "Civic"]));

        assert_eq!(response.models, vec!["Accord", "CR-V", "Civic", "Pilot"]);
        assert_eq!(response.total_count, 4);
    }

    #[test]
    fn test_year_range_response_counts_unique_models() {
        let mut yearly = YearlyModels::new();
        yearly.insert(2020, set(&["Accord", "Civic"]));
        yearly.insert(2021, set(&["Accord", "Civic", "Passport"]));
        yearly.insert(2022, ModelSet::new());

        let response = YearRangeResponse::new(2020, 2022, yearly);

        assert_eq!(response.total_unique_models, 3);
        assert_eq!(response.yearly_data.len(), 3);
        assert!(response.yearly_data[&2022].is_empty());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["yearly_data"]["2021"][2], "Passport");
    }

    #[test]
    fn test_health_response_omits_missing_fields() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
            api_connectivity: "ok".to_string(),
            test_query_result: Some("Found 2 models for 2020".to_string()),
            error: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["test_query_result"], "Found 2 models for 2020");
    }

    #[test]
    fn test_error_into_response_status() {
        let response = ApiError::UpstreamTimeout { year: 2020 }.into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        let response = ApiError::validation("start_year must be less than or equal to end_year")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
