use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    ValidationError { message: String },

    #[error("Request timeout while fetching data for year {year}")]
    UpstreamTimeout { year: i32 },

    #[error("Error fetching data for year {year}: {message}")]
    UpstreamError { year: i32, message: String },

    #[error("Internal error processing data for year {year}: {message}")]
    InternalError { year: i32, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 呼叫端輸入錯誤
    Validation,
    /// 上游 NHTSA 服務問題
    Upstream,
    /// 服務內部錯誤
    Internal,
    /// 啟動配置錯誤
    Configuration,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::ValidationError { .. } => ErrorCategory::Validation,
            ApiError::UpstreamTimeout { .. } | ApiError::UpstreamError { .. } => {
                ErrorCategory::Upstream
            }
            ApiError::InternalError { .. } => ErrorCategory::Internal,
            ApiError::ConfigError { .. }
            | ApiError::InvalidConfigValueError { .. }
            | ApiError::IoError(_) => ErrorCategory::Configuration,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ApiError::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 錯誤回應中 `error` 欄位的標籤
    pub fn label(&self) -> &'static str {
        match self.status_code() {
            StatusCode::BAD_REQUEST => "Validation Error",
            StatusCode::GATEWAY_TIMEOUT => "Gateway Timeout",
            StatusCode::BAD_GATEWAY => "Bad Gateway",
            _ => "Internal Server Error",
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Check the year parameters against the documented bounds",
            ErrorCategory::Upstream => "The NHTSA service may be slow or unavailable, try again later",
            ErrorCategory::Internal => "Inspect the server logs for the failing year",
            ErrorCategory::Configuration => "Fix the configuration file or environment variables",
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::UpstreamTimeout { year: 2020 }.status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::UpstreamError {
                year: 2020,
                message: "connection refused".to_string()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::InternalError {
                year: 2020,
                message: "expected value".to_string()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::ConfigError {
                message: "missing".to_string()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_messages_name_the_year() {
        let timeout = ApiError::UpstreamTimeout { year: 2019 };
        assert_eq!(
            timeout.to_string(),
            "Request timeout while fetching data for year 2019"
        );

        let upstream = ApiError::UpstreamError {
            year: 2021,
            message: "HTTP status server error (503 Service Unavailable)".to_string(),
        };
        assert!(upstream.to_string().starts_with("Error fetching data for year 2021"));
        assert!(upstream.to_string().contains("503"));
    }

    #[test]
    fn test_labels_and_categories() {
        assert_eq!(ApiError::validation("x").label(), "Validation Error");
        assert_eq!(ApiError::UpstreamTimeout { year: 1 }.label(), "Gateway Timeout");
        assert_eq!(
            ApiError::UpstreamTimeout { year: 1 }.category(),
            ErrorCategory::Upstream
        );
        assert_eq!(
            ApiError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")).category(),
            ErrorCategory::Configuration
        );
    }
}
