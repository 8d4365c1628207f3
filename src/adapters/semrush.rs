use crate::domain::ports::VolumeSource;
use crate::utils::error::{KeywordError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_SEMRUSH_ENDPOINT: &str = "https://api.semrush.com";

const SERVICE: &str = "semrush";
const KEYWORD_COLUMN: &str = "Keyword";
const VOLUME_COLUMN: &str = "Search Volume";

/// Semrush `phrase_these` report，每個關鍵字消耗 10 credits
pub struct SemrushClient {
    client: Client,
    endpoint: String,
    api_key: String,
    market: String,
    timeout: Duration,
}

impl SemrushClient {
    pub fn new(client: Client, endpoint: &str, api_key: &str, market: &str, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            market: market.trim().to_lowercase(),
            timeout,
        }
    }
}

fn format_error(message: impl Into<String>) -> KeywordError {
    KeywordError::ResponseFormatError {
        service: SERVICE.to_string(),
        message: message.into(),
    }
}

/// Parses the semicolon-separated export (`Keyword;Search Volume`).
///
/// `ERROR 50 :: NOTHING FOUND` means none of the phrases are in the
/// database, so it yields an empty map. Any other `ERROR` line fails the batch.
pub fn parse_semrush_response(body: &str) -> Result<HashMap<String, u64>> {
    let body = body.trim_start_matches('\u{feff}').trim();

    if body.starts_with("ERROR 50 ::") {
        return Ok(HashMap::new());
    }
    if body.starts_with("ERROR") {
        return Err(KeywordError::ServiceError {
            service: SERVICE.to_string(),
            message: body.lines().next().unwrap_or(body).to_string(),
        });
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| format_error(format!("missing '{}' column", name)))
    };
    let keyword_idx = column(KEYWORD_COLUMN)?;
    let volume_idx = column(VOLUME_COLUMN)?;

    let mut volumes = HashMap::new();
    for result in rdr.records() {
        let record = result?;
        let keyword = record
            .get(keyword_idx)
            .ok_or_else(|| format_error("row without keyword"))?;
        let raw_volume = record.get(volume_idx).unwrap_or("").trim();
        let volume = raw_volume
            .parse::<u64>()
            .map_err(|_| format_error(format!("invalid volume '{}' for '{}'", raw_volume, keyword)))?;
        volumes.insert(keyword.to_string(), volume);
    }

    Ok(volumes)
}

#[async_trait]
impl VolumeSource for SemrushClient {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn fetch_batch(&self, batch: &[String]) -> Result<HashMap<String, u64>> {
        let url = format!("{}/", self.endpoint);
        let phrase = batch.join(";");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("type", "phrase_these"),
                ("key", self.api_key.as_str()),
                ("export_columns", "Ph,Nq"),
                ("database", self.market.as_str()),
                ("phrase", phrase.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        tracing::debug!("{} response status: {}", SERVICE, response.status());
        if !response.status().is_success() {
            return Err(KeywordError::ServiceStatusError {
                service: SERVICE.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        parse_semrush_response(&body)
    }
}
