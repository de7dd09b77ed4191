use crate::utils::error::{ApiError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ApiError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ApiError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ApiError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(ApiError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ApiError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

// ---- 請求參數驗證：全部回傳 ValidationError (HTTP 400) ----

/// 年份需落在 `[min_year, max_year]`，`subject` 為錯誤訊息的開頭
pub fn validate_year(subject: &str, year: i32, min_year: i32, max_year: i32) -> Result<()> {
    if year < min_year || year > max_year {
        return Err(ApiError::validation(format!(
            "{} must be between {} and {}",
            subject, min_year, max_year
        )));
    }
    Ok(())
}

pub fn validate_year_order(start_year: i32, end_year: i32) -> Result<()> {
    if start_year > end_year {
        return Err(ApiError::validation(
            "start_year must be less than or equal to end_year",
        ));
    }
    Ok(())
}

/// 跨度 (`end_year - start_year`) 不可超過上限
pub fn validate_max_span(start_year: i32, end_year: i32, max_span: i32) -> Result<()> {
    if end_year - start_year > max_span {
        return Err(ApiError::validation(format!(
            "Year range cannot exceed {} years",
            max_span
        )));
    }
    Ok(())
}

pub fn validate_min_discontinuation_span(start_year: i32, end_year: i32, min_span: i32) -> Result<()> {
    if end_year - start_year < min_span {
        return Err(ApiError::validation(format!(
            "Year range must be at least {} years for discontinuation analysis",
            min_span
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("nhtsa_base_url", "https://example.com").is_ok());
        assert!(validate_url("nhtsa_base_url", "http://example.com").is_ok());
        assert!(validate_url("nhtsa_base_url", "").is_err());
        assert!(validate_url("nhtsa_base_url", "invalid-url").is_err());
        assert!(validate_url("nhtsa_base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("request_timeout", 10, 1).is_ok());
        assert!(validate_positive_number("request_timeout", 0, 1).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("make", "honda").is_ok());
        assert!(validate_non_empty_string("make", "   ").is_err());
    }

    #[test]
    fn test_validate_year_bounds() {
        assert!(validate_year("Year", 1990, 1990, 2030).is_ok());
        assert!(validate_year("Year", 2030, 1990, 2030).is_ok());

        let err = validate_year("Year", 1800, 1990, 2030).unwrap_err();
        assert_eq!(err.to_string(), "Year must be between 1990 and 2030");

        let err = validate_year("start_year", 2031, 1990, 2030).unwrap_err();
        assert_eq!(err.to_string(), "start_year must be between 1990 and 2030");
    }

    #[test]
    fn test_validate_year_order() {
        assert!(validate_year_order(2020, 2020).is_ok());
        assert!(validate_year_order(2020, 2022).is_ok());
        assert!(matches!(
            validate_year_order(2022, 2020),
            Err(ApiError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_validate_spans() {
        assert!(validate_max_span(2010, 2025, 15).is_ok());
        assert!(validate_max_span(2009, 2025, 15).is_err());

        assert!(validate_min_discontinuation_span(2018, 2021, 3).is_ok());
        let err = validate_min_discontinuation_span(2020, 2021, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Year range must be at least 3 years for discontinuation analysis"
        );
    }
}
