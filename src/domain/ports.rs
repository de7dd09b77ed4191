use crate::domain::model::ModelSet;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 某品牌各年份車型清單的來源
#[async_trait]
pub trait ModelSource: Send + Sync {
    async fn fetch_models(&self, year: i32) -> Result<ModelSet>;
}

pub trait UpstreamConfig: Send + Sync {
    fn base_url(&self) -> &str;
    fn make(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
}
