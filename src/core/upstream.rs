use crate::domain::model::ModelSet;
use crate::domain::ports::{ModelSource, UpstreamConfig};
use crate::utils::error::{ApiError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// NHTSA vPIC `getmodelsformakeyear` 回應中我們需要的部分
#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(rename = "Results", default)]
    results: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub struct NhtsaClient {
    client: Client,
    base_url: String,
    make: String,
    timeout: Duration,
}

impl NhtsaClient {
    pub fn new(base_url: impl Into<String>, make: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(Client::new(), base_url, make, timeout)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        make: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            make: make.into(),
            timeout,
        }
    }

    pub fn from_config<C: UpstreamConfig>(config: &C) -> Self {
        Self::new(
            config.base_url(),
            config.make(),
            Duration::from_secs(config.request_timeout_secs()),
        )
    }

    pub fn models_url(&self, year: i32) -> String {
        format!(
            "{}/make/{}/modelyear/{}?format=json",
            self.base_url, self.make, year
        )
    }

    fn map_transport_error(year: i32, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::UpstreamTimeout { year }
        } else {
            ApiError::UpstreamError {
                year,
                message: err.to_string(),
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseModelsError {
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Model_Name must be a string, got {0}")]
    NonStringModelName(serde_json::Value),
}

/// 從回應內容取出車型名稱：去除前後空白，null 與空字串略過，其他非字串值視為資料錯誤
pub fn parse_models(body: &str) -> std::result::Result<ModelSet, ParseModelsError> {
    let response: ModelsResponse = serde_json::from_str(body)?;

    let mut models = ModelSet::new();
    for entry in response.results.unwrap_or_default() {
        let name = match entry.get("Model_Name") {
            None | Some(serde_json::Value::Null) => continue,
            Some(serde_json::Value::String(name)) => name.trim(),
            Some(other) => return Err(ParseModelsError::NonStringModelName(other.clone())),
        };

        if !name.is_empty() {
            models.insert(name.to_string());
        }
    }

    Ok(models)
}

#[async_trait::async_trait]
impl ModelSource for NhtsaClient {
    async fn fetch_models(&self, year: i32) -> Result<ModelSet> {
        let url = self.models_url(year);
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Self::map_transport_error(year, e))?;

        tracing::debug!("API response status for {}: {}", year, response.status());

        let response = response
            .error_for_status()
            .map_err(|e| Self::map_transport_error(year, e))?;

        let body = response
            .text()
            .await
            .map_err(|e| Self::map_transport_error(year, e))?;

        let models = parse_models(&body).map_err(|e| ApiError::InternalError {
            year,
            message: e.to_string(),
        })?;

        tracing::debug!("Fetched {} models for {} {}", models.len(), self.make, year);
        Ok(models)
    }
}
