use crate::domain::model::{Dataset, VolumeSourceKind};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// 城市資料集位置：本機路徑或 http(s) URL
    fn cities_location(&self) -> &str;
    fn city_country(&self) -> Option<&str>;
    fn seed(&self) -> Option<&str>;
    fn market(&self) -> Option<&str>;
    fn source(&self) -> VolumeSourceKind;
    fn api_key(&self) -> Option<&str>;
    fn surfer_endpoint(&self) -> &str;
    fn semrush_endpoint(&self) -> &str;
    fn batch_size(&self) -> usize;
    fn request_timeout(&self) -> Duration;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn include_status(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// 載入城市並產生關鍵字
    async fn extract(&self) -> Result<Vec<String>>;
    /// 分批查詢搜尋量並合併
    async fn transform(&self, keywords: Vec<String>) -> Result<Dataset>;
    /// 寫出 CSV 與執行報告，回傳 CSV 路徑
    async fn load(&self, dataset: Dataset) -> Result<String>;
}

/// One external keyword database. A call covers exactly one batch; any error
/// means the whole batch is lost.
#[async_trait]
pub trait VolumeSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_batch(&self, batch: &[String]) -> Result<HashMap<String, u64>>;
}

pub trait ProgressReporter: Send + Sync {
    /// `fraction` 介於 0.0 與 1.0
    fn report(&self, fraction: f64);
}
