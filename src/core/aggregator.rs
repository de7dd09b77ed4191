use crate::domain::model::{
    DiscontinuationResult, ModelSet, ProbeResult, ProbeStatus, StatisticsResult, TrendAnalysis,
    YearCount, YearlyModels,
};
use crate::domain::ports::ModelSource;
use crate::utils::error::{ApiError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 統計結果中停產車型樣本的最大筆數
pub const DISCONTINUED_SAMPLE_SIZE: usize = 10;

#[derive(Clone)]
pub struct ModelAggregator {
    source: Arc<dyn ModelSource>,
    reference_year: i32,
}

impl ModelAggregator {
    pub fn new(source: Arc<dyn ModelSource>, reference_year: i32) -> Self {
        Self {
            source,
            reference_year,
        }
    }

    pub async fn fetch_models(&self, year: i32) -> Result<ModelSet> {
        self.source.fetch_models(year).await
    }

    /// 逐年查詢 `[start_year, end_year]`，任一年失敗即中止並回傳該錯誤
    pub async fn fetch_range(&self, start_year: i32, end_year: i32) -> Result<YearlyModels> {
        let mut yearly_models = YearlyModels::new();

        for year in start_year..=end_year {
            let models = self.source.fetch_models(year).await.inspect_err(|e| {
                tracing::warn!("❌ Range {}-{} aborted at year {}: {}", start_year, end_year, year, e);
            })?;
            yearly_models.insert(year, models);
        }

        tracing::debug!(
            "Fetched {} years of models ({}-{})",
            yearly_models.len(),
            start_year,
            end_year
        );
        Ok(yearly_models)
    }

    pub async fn find_discontinued(
        &self,
        start_year: i32,
        end_year: i32,
    ) -> Result<DiscontinuationResult> {
        let yearly_models = self.fetch_range(start_year, end_year).await?;
        let result = discontinued_between(&yearly_models, start_year, end_year);

        tracing::info!(
            "🔍 Discontinuation {}-{}: {} early, {} recent, {} discontinued",
            start_year,
            end_year,
            result.early_years_models.len(),
            result.recent_years_models.len(),
            result.discontinued_models.len()
        );
        Ok(result)
    }

    /// 統計摘要；停產分析會對同一區間再查詢一次上游
    pub async fn summarize(&self, start_year: i32, end_year: i32) -> Result<StatisticsResult> {
        let yearly_models = self.fetch_range(start_year, end_year).await?;
        let discontinued = self.find_discontinued(start_year, end_year).await?;

        summarize_yearly(&yearly_models, &discontinued.discontinued_models, start_year, end_year)
    }

    /// 以參考年份做一次查詢，任何錯誤都轉為 degraded 狀態
    pub async fn probe(&self) -> ProbeResult {
        match self.source.fetch_models(self.reference_year).await {
            Ok(models) => ProbeResult {
                status: ProbeStatus::Healthy,
                api_connectivity: "ok".to_string(),
                test_query_result: Some(format!(
                    "Found {} models for {}",
                    models.len(),
                    self.reference_year
                )),
                error: None,
            },
            Err(e) => {
                tracing::warn!("⚠️ Upstream probe failed: {}", e);
                ProbeResult {
                    status: ProbeStatus::Degraded,
                    api_connectivity: "error".to_string(),
                    test_query_result: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

fn union_years(yearly_models: &YearlyModels, from: i32, to: i32) -> ModelSet {
    if from > to {
        return ModelSet::new();
    }

    yearly_models
        .range(from..=to)
        .flat_map(|(_, models)| models.iter().cloned())
        .collect()
}

/// 早期 `[start, end-2]` 出現過、最近兩年 `[end-1, end]` 皆未出現的車型
pub fn discontinued_between(
    yearly_models: &YearlyModels,
    start_year: i32,
    end_year: i32,
) -> DiscontinuationResult {
    let early_years_models = union_years(yearly_models, start_year, end_year - 2);
    let recent_years_models = union_years(yearly_models, end_year - 1, end_year);

    let discontinued_models = early_years_models
        .difference(&recent_years_models)
        .cloned()
        .collect();

    DiscontinuationResult {
        early_years_models,
        recent_years_models,
        discontinued_models,
    }
}

pub fn summarize_yearly(
    yearly_models: &YearlyModels,
    discontinued_models: &ModelSet,
    start_year: i32,
    end_year: i32,
) -> Result<StatisticsResult> {
    if start_year > end_year {
        return Err(ApiError::validation(
            "start_year must be less than or equal to end_year",
        ));
    }

    // 缺少的年份視為 0 款
    let yearly_model_counts: BTreeMap<i32, usize> = (start_year..=end_year)
        .map(|year| (year, yearly_models.get(&year).map_or(0, |models| models.len())))
        .collect();

    let total_unique_models = union_years(yearly_models, start_year, end_year).len();

    // BTreeMap 依年份遞增迭代；只有嚴格大於/小於才更新，平手保留較早的年份
    let mut peak_year: Option<YearCount> = None;
    let mut lowest_year: Option<YearCount> = None;
    for (&year, &model_count) in &yearly_model_counts {
        let current = YearCount { year, model_count };
        if peak_year.map_or(true, |p| model_count > p.model_count) {
            peak_year = Some(current);
        }
        if lowest_year.map_or(true, |l| model_count < l.model_count) {
            lowest_year = Some(current);
        }
    }

    let total: usize = yearly_model_counts.values().sum();
    let average = total as f64 / yearly_model_counts.len() as f64;

    let trend_analysis = trend_between(&yearly_model_counts, start_year, end_year);

    let discontinued_sample: Vec<String> = discontinued_models
        .iter()
        .take(DISCONTINUED_SAMPLE_SIZE)
        .cloned()
        .collect();

    Ok(StatisticsResult {
        analysis_period: format!("{}-{}", start_year, end_year),
        total_unique_models,
        peak_year: peak_year.unwrap_or(YearCount { year: start_year, model_count: 0 }),
        lowest_year: lowest_year.unwrap_or(YearCount { year: start_year, model_count: 0 }),
        yearly_model_counts,
        average_models_per_year: round_one_decimal(average),
        discontinued_models_count: discontinued_models.len(),
        discontinued_models: discontinued_sample,
        trend_analysis,
    })
}

/// 每年與前一年比較：增加列入 growth，減少列入 decline，持平兩者皆不列
pub fn trend_between(
    yearly_model_counts: &BTreeMap<i32, usize>,
    start_year: i32,
    end_year: i32,
) -> TrendAnalysis {
    let mut trend = TrendAnalysis::default();

    for year in (start_year + 1)..=end_year {
        let current = yearly_model_counts.get(&year).copied().unwrap_or(0);
        let previous = yearly_model_counts.get(&(year - 1)).copied().unwrap_or(0);

        if current > previous {
            trend.growth_years.push(year);
        } else if current < previous {
            trend.decline_years.push(year);
        }
    }

    trend
}

/// 四捨五入到小數一位 (half away from zero)
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
