use crate::domain::ports::VolumeSource;
use crate::utils::error::{KeywordError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use url::{form_urlencoded, Url};

pub const DEFAULT_SURFER_ENDPOINT: &str = "https://db2.keywordsur.fr";

const SERVICE: &str = "surfer";

/// Keyword Surfer 免費 API
pub struct SurferClient {
    client: Client,
    endpoint: String,
    market: String,
    timeout: Duration,
}

impl SurferClient {
    pub fn new(client: Client, endpoint: &str, market: &str, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            market: market.trim().to_lowercase(),
            timeout,
        }
    }

    /// `keyword_surfer_keywords?country=<market>&keywords=<JSON 陣列>`，空白編成 `%20`
    pub fn request_url(&self, batch: &[String]) -> Result<Url> {
        let keywords = serde_json::to_string(batch)?;
        let raw = format!(
            "{}/keyword_surfer_keywords?country={}&keywords={}",
            self.endpoint,
            encode_component(&self.market),
            encode_component(&keywords)
        );

        Url::parse(&raw).map_err(|e| KeywordError::InvalidConfigValueError {
            field: "surfer_endpoint".to_string(),
            value: self.endpoint.clone(),
            reason: e.to_string(),
        })
    }
}

// form 編碼把空白寫成 `+`，字面上的 `+` 已是 `%2B`
fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// `{"<keyword>": {"search_volume": 120, ...}, ...}`; entries without a
/// numeric `search_volume` are ignored.
pub fn parse_surfer_response(body: &str) -> Result<HashMap<String, u64>> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| KeywordError::ResponseFormatError {
            service: SERVICE.to_string(),
            message: e.to_string(),
        })?;

    let entries = match value {
        serde_json::Value::Object(entries) => entries,
        other => {
            return Err(KeywordError::ResponseFormatError {
                service: SERVICE.to_string(),
                message: format!("expected a JSON object, got {}", other),
            })
        }
    };

    let mut volumes = HashMap::with_capacity(entries.len());
    for (keyword, entry) in entries {
        let volume = entry.get("search_volume").and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
        });
        match volume {
            Some(volume) => {
                volumes.insert(keyword, volume);
            }
            None => tracing::debug!("{}: no search_volume for '{}'", SERVICE, keyword),
        }
    }

    Ok(volumes)
}

#[async_trait]
impl VolumeSource for SurferClient {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn fetch_batch(&self, batch: &[String]) -> Result<HashMap<String, u64>> {
        let url = self.request_url(batch)?;

        let response = self
            .client
            .get(url)
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
        parse_surfer_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_parse_volumes() {
        let body = r#"{
            "hotel paris": {"search_volume": 5400, "cpc": 1.2},
            "hotel lyon": {"search_volume": 880.0},
            "hotel nice": {"cpc": 0.4}
        }"#;
        let volumes = parse_surfer_response(body).unwrap();
        assert_eq!(volumes.len(), 2);
        assert_eq!(volumes["hotel paris"], 5400);
        assert_eq!(volumes["hotel lyon"], 880);
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            parse_surfer_response("<html>rate limited</html>"),
            Err(KeywordError::ResponseFormatError { .. })
        ));
        assert!(parse_surfer_response("[1, 2]").is_err());
    }

    #[test]
    fn test_empty_object_is_not_a_failure() {
        assert!(parse_surfer_response("{}").unwrap().is_empty());
    }

    #[test]
    fn test_request_url_encodes_spaces_as_percent_20() {
        let client = SurferClient::new(Client::new(), "https://db2.keywordsur.fr/", "FR", Duration::from_secs(5));
        let batch = vec!["hotel paris".to_string(), "c++ lyon".to_string()];
        let url = client.request_url(&batch).unwrap();

        assert_eq!(url.path(), "/keyword_surfer_keywords");
        let query = url.query().unwrap();
        assert!(query.starts_with("country=fr&keywords="));
        assert!(query.contains("%22hotel%20paris%22"));
        assert!(query.contains("%22c%2B%2B%20lyon%22"));
        assert!(!query.contains('+'));

        let decoded: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(decoded["keywords"], r#"["hotel paris","c++ lyon"]"#);
    }

    #[tokio::test]
    async fn test_fetch_batch_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/keyword_surfer_keywords");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(serde_json::json!({"hotel paris": {"search_volume": 10}}));
        });

        let client = SurferClient::new(Client::new(), &server.base_url(), "fr", Duration::from_secs(1));
        let started = std::time::Instant::now();
        let result = client.fetch_batch(&["hotel paris".to_string()]).await;

        assert!(matches!(result, Err(KeywordError::ApiError(_))));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_fetch_batch_sends_json_keyword_list() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/keyword_surfer_keywords")
                .query_param("country", "fr")
                .query_param("keywords", r#"["restaurant lyon","restaurant nice"]"#);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"restaurant lyon": {"search_volume": 100}}));
        });

        let client = SurferClient::new(Client::new(), &server.base_url(), "FR", Duration::from_secs(5));
        let batch = vec!["restaurant lyon".to_string(), "restaurant nice".to_string()];
        let volumes = client.fetch_batch(&batch).await.unwrap();

        mock.assert();
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes["restaurant lyon"], 100);
    }

    #[tokio::test]
    async fn test_fetch_batch_error_status() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/keyword_surfer_keywords");
            then.status(503);
        });

        let client = SurferClient::new(Client::new(), &server.base_url(), "fr", Duration::from_secs(5));
        let result = client.fetch_batch(&["hotel paris".to_string()]).await;

        mock.assert();
        assert!(matches!(
            result,
            Err(KeywordError::ServiceStatusError { status: 503, .. })
        ));
    }
}
