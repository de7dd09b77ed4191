use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 單一年份的車型集合 (已去除前後空白、自動去重並依字典序排列)
pub type ModelSet = BTreeSet<String>;

/// 年份 -> 車型集合，涵蓋查詢區間內的每一年
pub type YearlyModels = BTreeMap<i32, ModelSet>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscontinuationResult {
    pub early_years_models: ModelSet,
    pub recent_years_models: ModelSet,
    pub discontinued_models: ModelSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub model_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub growth_years: Vec<i32>,
    pub decline_years: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResult {
    pub analysis_period: String,
    pub total_unique_models: usize,
    pub yearly_model_counts: BTreeMap<i32, usize>,
    pub peak_year: YearCount,
    pub lowest_year: YearCount,
    pub average_models_per_year: f64,
    pub discontinued_models_count: usize,
    pub discontinued_models: Vec<String>,
    pub trend_analysis: TrendAnalysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub status: ProbeStatus,
    pub api_connectivity: String,
    pub test_query_result: Option<String>,
    pub error: Option<String>,
}
