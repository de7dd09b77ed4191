use std::sync::Arc;

use crate::config::Settings;
use crate::core::aggregator::ModelAggregator;
use crate::core::upstream::NhtsaClient;
use crate::domain::ports::ModelSource;

// 應用狀態
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub aggregator: ModelAggregator,
}

impl AppState {
    pub fn new(settings: Settings, source: Arc<dyn ModelSource>) -> Self {
        let aggregator = ModelAggregator::new(source, settings.health_reference_year);
        Self {
            settings: Arc::new(settings),
            aggregator,
        }
    }

    /// 以設定建立 NHTSA 用戶端
    pub fn from_settings(settings: Settings) -> Self {
        let client = NhtsaClient::from_config(&settings);
        Self::new(settings, Arc::new(client))
    }
}
