use crate::domain::ports::UpstreamConfig;
use crate::utils::error::{ApiError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// 服務設定，所有欄位皆有預設值，可由 TOML 檔、環境變數覆寫
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub project_name: String,
    pub project_description: String,
    pub version: String,

    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,

    pub nhtsa_base_url: String,
    pub make: String,
    /// 單次上游請求的逾時秒數
    pub request_timeout: u64,

    pub max_year_range: i32,
    pub min_year: i32,
    pub max_year: i32,
    pub min_discontinuation_range: i32,

    pub statistics_default_start: i32,
    pub statistics_default_end: i32,
    pub health_reference_year: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_name: "Honda Vehicle Models API".to_string(),
            project_description: "API to analyze Honda vehicle models using NHTSA database"
                .to_string(),
            version: "1.0.0".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: vec!["*".to_string()],
            nhtsa_base_url: "https://vpic.nhtsa.dot.gov/api/vehicles/getmodelsformakeyear"
                .to_string(),
            make: "honda".to_string(),
            request_timeout: 10,
            max_year_range: 15,
            min_year: 1990,
            max_year: 2030,
            min_discontinuation_range: 3,
            statistics_default_start: 2015,
            statistics_default_end: 2025,
            health_reference_year: 2020,
        }
    }
}

impl Settings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ApiError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定，未列出的欄位使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ApiError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${NHTSA_BASE_URL})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ApiError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 以行程環境變數覆寫設定
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// 以任意查詢函式覆寫設定 (測試時可避免修改行程環境)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("NHTSA_BASE_URL") {
            self.nhtsa_base_url = value;
        }
        if let Some(value) = lookup("MAKE") {
            self.make = value;
        }
        if let Some(value) = lookup("HOST") {
            self.host = value;
        }

        parse_override(&lookup, "PORT", &mut self.port)?;
        parse_override(&lookup, "REQUEST_TIMEOUT", &mut self.request_timeout)?;
        parse_override(&lookup, "MIN_YEAR", &mut self.min_year)?;
        parse_override(&lookup, "MAX_YEAR", &mut self.max_year)?;
        parse_override(&lookup, "MAX_YEAR_RANGE", &mut self.max_year_range)?;
        parse_override(
            &lookup,
            "MIN_DISCONTINUATION_RANGE",
            &mut self.min_discontinuation_range,
        )?;

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_override<F, T>(lookup: &F, key: &str, target: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ApiError::InvalidConfigValueError {
                field: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            })?;
    }
    Ok(())
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("nhtsa_base_url", &self.nhtsa_base_url)?;
        validate_non_empty_string("make", &self.make)?;
        validate_non_empty_string("host", &self.host)?;
        validate_positive_number("request_timeout", self.request_timeout, 1)?;

        if self.min_year > self.max_year {
            return Err(ApiError::InvalidConfigValueError {
                field: "min_year".to_string(),
                value: self.min_year.to_string(),
                reason: format!("Value must not exceed max_year ({})", self.max_year),
            });
        }

        // 早期區間至少要有一年
        validate_range(
            "min_discontinuation_range",
            self.min_discontinuation_range,
            2,
            self.max_year_range,
        )?;

        validate_range(
            "health_reference_year",
            self.health_reference_year,
            self.min_year,
            self.max_year,
        )?;
        validate_range(
            "statistics_default_start",
            self.statistics_default_start,
            self.min_year,
            self.statistics_default_end,
        )?;
        validate_range(
            "statistics_default_end",
            self.statistics_default_end,
            self.statistics_default_start,
            self.max_year,
        )?;

        tracing::debug!("✅ Settings validation passed");
        Ok(())
    }
}

impl UpstreamConfig for Settings {
    fn base_url(&self) -> &str {
        &self.nhtsa_base_url
    }

    fn make(&self) -> &str {
        &self.make
    }

    fn request_timeout_secs(&self) -> u64 {
        self.request_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.make, "honda");
        assert_eq!(settings.max_year_range, 15);
        assert_eq!(settings.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_parse_partial_toml_keeps_defaults() {
        let toml_content = r#"
make = "toyota"
request_timeout = 5
max_year = 2026
allowed_origins = ["https://dashboard.example.com"]
"#;

        let settings = Settings::from_toml_str(toml_content).unwrap();

        assert_eq!(settings.make, "toyota");
        assert_eq!(settings.request_timeout, 5);
        assert_eq!(settings.max_year, 2026);
        assert_eq!(settings.min_year, 1990);
        assert_eq!(settings.allowed_origins, vec!["https://dashboard.example.com"]);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("VEHICLE_API_TEST_UPSTREAM", "https://mirror.example.com/vpic");

        let toml_content = r#"
nhtsa_base_url = "${VEHICLE_API_TEST_UPSTREAM}"
"#;

        let settings = Settings::from_toml_str(toml_content).unwrap();
        assert_eq!(settings.nhtsa_base_url, "https://mirror.example.com/vpic");

        std::env::remove_var("VEHICLE_API_TEST_UPSTREAM");
    }

    #[test]
    fn test_unknown_env_var_is_left_in_place() {
        let settings =
            Settings::from_toml_str(r#"make = "${VEHICLE_API_TEST_SURELY_UNSET}""#).unwrap();
        assert_eq!(settings.make, "${VEHICLE_API_TEST_SURELY_UNSET}");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = Settings::from_toml_str("max_year = \"not a number\"");
        assert!(matches!(result, Err(ApiError::ConfigError { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MAKE", "acura"),
            ("REQUEST_TIMEOUT", "3"),
            ("MAX_YEAR_RANGE", "20"),
            ("PORT", "9090"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(settings.make, "acura");
        assert_eq!(settings.request_timeout, 3);
        assert_eq!(settings.max_year_range, 20);
        assert_eq!(settings.port, 9090);
        assert_eq!(settings.min_year, 1990);
    }

    #[test]
    fn test_unparseable_override_is_rejected() {
        let mut settings = Settings::default();
        let result = settings.apply_overrides(|key| {
            (key == "MIN_YEAR").then(|| "nineteen-ninety".to_string())
        });

        match result {
            Err(ApiError::InvalidConfigValueError { field, .. }) => assert_eq!(field, "MIN_YEAR"),
            other => panic!("expected InvalidConfigValueError, got {:?}", other),
        }
    }

    #[test]
    fn test_config_validation() {
        let mut settings = Settings::default();
        settings.nhtsa_base_url = "invalid-url".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.min_year = 2031;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.min_discontinuation_range = 1;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.request_timeout = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.health_reference_year = 1980;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
project_name = "File Test API"
port = 8123
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let settings = Settings::from_file(temp_file.path()).unwrap();
        assert_eq!(settings.project_name, "File Test API");
        assert_eq!(settings.port, 8123);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Settings::from_file("/definitely/not/here/settings.toml");
        assert!(matches!(result, Err(ApiError::IoError(_))));
    }
}
