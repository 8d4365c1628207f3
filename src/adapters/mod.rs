// Adapters layer: concrete implementations for external systems (city dataset, volume services).

pub mod cities;
pub mod semrush;
pub mod storage;
pub mod surfer;

use crate::domain::model::VolumeSourceKind;
use crate::domain::ports::{ConfigProvider, VolumeSource};
use crate::utils::error::{KeywordError, Result};
use reqwest::Client;

pub use semrush::SemrushClient;
pub use storage::LocalStorage;
pub use surfer::SurferClient;

/// 依設定建立對應的搜尋量來源
pub fn build_volume_source<C: ConfigProvider>(config: &C, client: Client) -> Result<Box<dyn VolumeSource>> {
    let market = config.market().ok_or_else(|| KeywordError::MissingConfigError {
        field: "market".to_string(),
    })?;

    let source: Box<dyn VolumeSource> = match config.source() {
        VolumeSourceKind::Surfer => Box::new(SurferClient::new(
            client,
            config.surfer_endpoint(),
            market,
            config.request_timeout(),
        )),
        VolumeSourceKind::Semrush => {
            let api_key = config
                .api_key()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| KeywordError::MissingConfigError {
                    field: "api_key".to_string(),
                })?;
            Box::new(SemrushClient::new(
                client,
                config.semrush_endpoint(),
                api_key,
                market,
                config.request_timeout(),
            ))
        }
    };

    Ok(source)
}
