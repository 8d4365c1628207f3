use crate::adapters::cities::DEFAULT_CITIES_URL;
use crate::adapters::semrush::DEFAULT_SEMRUSH_ENDPOINT;
use crate::adapters::surfer::DEFAULT_SURFER_ENDPOINT;
use crate::config::{redact, validate_run_settings, DEFAULT_OUTPUT_FILE, DEFAULT_TIMEOUT_SECS};
use crate::core::batch::DEFAULT_BATCH_SIZE;
use crate::core::ConfigProvider;
use crate::domain::model::VolumeSourceKind;
use crate::utils::error::{KeywordError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub keywords: KeywordsConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordsConfig {
    pub seed: Option<String>,
    pub country: Option<String>,
    pub cities: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: VolumeSourceKind,
    pub market: Option<String>,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("type", &self.r#type)
            .field("market", &self.market)
            .field("api_key", &redact(self.api_key.as_deref()))
            .field("endpoint", &self.endpoint)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub batch_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub filename: Option<String>,
    pub include_status: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    /// "compact" (預設) 或 "json"
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| KeywordError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SEMRUSH_API_KEY})，未設定的保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| KeywordError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn endpoint_for(&self, kind: VolumeSourceKind, default: &'static str) -> &str {
        match &self.source.endpoint {
            Some(endpoint) if self.source.r#type == kind => endpoint.as_str(),
            _ => default,
        }
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn cities_location(&self) -> &str {
        self.keywords.cities.as_deref().unwrap_or(DEFAULT_CITIES_URL)
    }

    fn city_country(&self) -> Option<&str> {
        self.keywords.country.as_deref()
    }

    fn seed(&self) -> Option<&str> {
        self.keywords.seed.as_deref()
    }

    fn market(&self) -> Option<&str> {
        self.source
            .market
            .as_deref()
            .or(self.keywords.country.as_deref())
    }

    fn source(&self) -> VolumeSourceKind {
        self.source.r#type
    }

    fn api_key(&self) -> Option<&str> {
        self.source.api_key.as_deref()
    }

    fn surfer_endpoint(&self) -> &str {
        self.endpoint_for(VolumeSourceKind::Surfer, DEFAULT_SURFER_ENDPOINT)
    }

    fn semrush_endpoint(&self) -> &str {
        self.endpoint_for(VolumeSourceKind::Semrush, DEFAULT_SEMRUSH_ENDPOINT)
    }

    fn batch_size(&self) -> usize {
        self.extract.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_file(&self) -> &str {
        self.load.filename.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }

    fn include_status(&self) -> bool {
        self.load.include_status.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_run_settings(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[keywords]
seed = "hotel"
country = "FR"

[source]
type = "surfer"

[load]
output_path = "./test-output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.seed(), Some("hotel"));
        assert_eq!(config.source(), VolumeSourceKind::Surfer);
        assert_eq!(config.market(), Some("FR"));
        assert_eq!(config.batch_size(), 50);
        assert_eq!(config.output_file(), "file.csv");
        assert_eq!(config.cities_location(), DEFAULT_CITIES_URL);
        assert_eq!(config.surfer_endpoint(), DEFAULT_SURFER_ENDPOINT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_applies_to_selected_source() {
        let toml_content = r#"
[keywords]
seed = "lawyer"
country = "DE"

[source]
type = "semrush"
market = "de"
api_key = "secret"
endpoint = "http://localhost:9000"
timeout_seconds = 10

[extract]
batch_size = 25

[load]
output_path = "./out"
filename = "lawyers.csv"
include_status = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.semrush_endpoint(), "http://localhost:9000");
        assert_eq!(config.surfer_endpoint(), DEFAULT_SURFER_ENDPOINT);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.batch_size(), 25);
        assert_eq!(config.output_file(), "lawyers.csv");
        assert!(config.include_status());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LOCAL_KEYWORDS_TEST_KEY", "from-env");

        let toml_content = r#"
[keywords]
seed = "hotel"
country = "FR"

[source]
type = "semrush"
api_key = "${LOCAL_KEYWORDS_TEST_KEY}"

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("from-env"));

        std::env::remove_var("LOCAL_KEYWORDS_TEST_KEY");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let toml_content = r#"
[keywords]
seed = "hotel"
country = "FR"

[source]
type = "semrush"
api_key = "TOPSECRET123"

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let formatted = format!("{:?}", config);

        assert!(!formatted.contains("TOPSECRET123"));
        assert!(formatted.contains("api_key: Some(\"***\")"));
    }

    #[test]
    fn test_unresolved_api_key_rejected() {
        let toml_content = r#"
[keywords]
seed = "hotel"
country = "FR"

[source]
type = "semrush"
api_key = "${LOCAL_KEYWORDS_UNSET_VARIABLE}"

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(KeywordError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_unknown_source_type_rejected() {
        let toml_content = r#"
[keywords]
seed = "hotel"

[source]
type = "ahrefs"

[load]
output_path = "./output"
"#;

        assert!(TomlConfig::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[keywords]
seed = "restaurant"
country = "ES"

[source]
type = "surfer"

[load]
output_path = "./output"

[monitoring]
enabled = true
log_format = "json"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.seed(), Some("restaurant"));
        assert!(config.monitoring_enabled());
        assert!(config.json_logs());
    }
}
