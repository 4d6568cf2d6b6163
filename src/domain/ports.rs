use crate::domain::model::{ArtworkData, ValuationResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 外部估價服務：一次請求、一次回應
#[async_trait]
pub trait ValuationService: Send + Sync {
    async fn valuate(&self, data: &ArtworkData) -> Result<ValuationResult>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn model(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
    fn temperature(&self) -> f32;
    fn market_region(&self) -> &str;
    fn currency(&self) -> &str;
    fn auction_houses(&self) -> &[String];
}
