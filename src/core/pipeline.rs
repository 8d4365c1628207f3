use crate::adapters::{build_volume_source, cities::load_cities};
use crate::core::batch::make_batches;
use crate::core::fetcher::{fetch_volumes, LogProgress};
use crate::core::keywords::{available_countries, generate_keywords};
use crate::core::merge::merge;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{CityRecord, Dataset, KeywordVolume, RunReport, VolumeResult};
use crate::domain::ports::ProgressReporter;
use crate::utils::error::{KeywordError, Result};
use reqwest::Client;

pub const REPORT_FILE: &str = "report.json";

pub struct KeywordPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
    progress: Box<dyn ProgressReporter>,
}

impl<S: Storage, C: ConfigProvider> KeywordPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
            progress: Box::new(LogProgress),
        }
    }

    pub fn with_progress(mut self, progress: impl ProgressReporter + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub async fn cities(&self) -> Result<Vec<CityRecord>> {
        load_cities(
            &self.client,
            self.config.cities_location(),
            self.config.request_timeout(),
        )
        .await
    }

    /// 資料集中可選的國家代碼
    pub async fn available_countries(&self) -> Result<Vec<String>> {
        Ok(available_countries(&self.cities().await?))
    }
}

/// `keyword,volume[,status]` 格式的 CSV
pub fn encode_csv(rows: &[KeywordVolume], include_status: bool) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    if include_status {
        wtr.write_record(["keyword", "volume", "status"])?;
    } else {
        wtr.write_record(["keyword", "volume"])?;
    }

    for row in rows {
        let volume = row.volume.to_string();
        if include_status {
            wtr.write_record([row.keyword.as_str(), volume.as_str(), row.status.as_str()])?;
        } else {
            wtr.write_record([row.keyword.as_str(), volume.as_str()])?;
        }
    }

    wtr.into_inner()
        .map_err(|e| KeywordError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for KeywordPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<String>> {
        let seed = self.config.seed().ok_or_else(|| KeywordError::MissingConfigError {
            field: "seed".to_string(),
        })?;
        let country = self
            .config
            .city_country()
            .ok_or_else(|| KeywordError::MissingConfigError {
                field: "country".to_string(),
            })?;

        let cities = self.cities().await?;
        let keywords = generate_keywords(seed, country, &cities)?;

        if keywords.is_empty() {
            tracing::warn!("No cities found for country '{}'", country);
        }

        Ok(keywords)
    }

    async fn transform(&self, keywords: Vec<String>) -> Result<Dataset> {
        let source = build_volume_source(&self.config, self.client.clone())?;
        let batches = make_batches(&keywords, self.config.batch_size())?;

        tracing::info!(
            "🔎 Fetching volumes from {} for {} keywords in {} batches",
            source.name(),
            keywords.len(),
            batches.len()
        );

        let mut volumes = VolumeResult::new();
        fetch_volumes(source.as_ref(), &batches, self.progress.as_ref(), &mut volumes).await;

        let rows = merge(&keywords, &volumes);
        let report = RunReport::from_rows(
            self.config.source(),
            self.config.market().unwrap_or_default(),
            &rows,
            &volumes,
        );

        tracing::info!(
            "Merged {} rows: {} found, {} not found, {} failed",
            report.keywords,
            report.found,
            report.not_found,
            report.failed
        );

        Ok(Dataset { rows, report })
    }

    async fn load(&self, dataset: Dataset) -> Result<String> {
        let csv_data = encode_csv(&dataset.rows, self.config.include_status())?;
        tracing::debug!("Writing {} bytes of CSV", csv_data.len());
        self.storage
            .write_file(self.config.output_file(), &csv_data)
            .await?;

        let report = serde_json::to_string_pretty(&dataset.report)?;
        self.storage.write_file(REPORT_FILE, report.as_bytes()).await?;

        Ok(format!(
            "{}/{}",
            self.config.output_path().trim_end_matches('/'),
            self.config.output_file()
        ))
    }
}
