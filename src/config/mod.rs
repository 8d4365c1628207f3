pub mod toml_config;

use crate::adapters::cities::is_remote;
use crate::core::ConfigProvider;
use crate::domain::model::VolumeSourceKind;
use crate::utils::error::{KeywordError, Result};
use crate::utils::validation::{
    validate_country_code, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, validate_required_field, validate_url,
};

pub const DEFAULT_OUTPUT_FILE: &str = "file.csv";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const MAX_BATCH_SIZE: usize = 100;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::*;
    use crate::adapters::cities::DEFAULT_CITIES_URL;
    use crate::adapters::semrush::DEFAULT_SEMRUSH_ENDPOINT;
    use crate::adapters::surfer::DEFAULT_SURFER_ENDPOINT;
    use crate::core::batch::DEFAULT_BATCH_SIZE;
    use crate::utils::validation::Validate;
    use clap::Parser;
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::time::Duration;

    #[derive(Clone, Serialize, Deserialize, Parser)]
    #[command(name = "local-keywords")]
    #[command(about = "Generate local keywords (seed + city) and fetch their search volume")]
    pub struct CliConfig {
        /// City dataset (geonames TSV): local path or http(s) URL
        #[arg(long, default_value = DEFAULT_CITIES_URL)]
        pub cities: String,

        /// Two-letter code of the country whose cities are used
        #[arg(long)]
        pub country: Option<String>,

        /// Main keyword (e.g. hotel, restaurant, lawyer)
        #[arg(long)]
        pub seed: Option<String>,

        /// Market queried for volumes; defaults to --country
        #[arg(long)]
        pub market: Option<String>,

        #[arg(long, value_enum, default_value_t = VolumeSourceKind::Surfer)]
        pub source: VolumeSourceKind,

        /// Semrush API key (10 credits per keyword)
        #[arg(long, env = "SEMRUSH_API_KEY", hide_env_values = true)]
        pub api_key: Option<String>,

        #[arg(long, default_value = DEFAULT_SURFER_ENDPOINT)]
        pub surfer_endpoint: String,

        #[arg(long, default_value = DEFAULT_SEMRUSH_ENDPOINT)]
        pub semrush_endpoint: String,

        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        pub batch_size: usize,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        pub timeout_secs: u64,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
        pub output_file: String,

        /// Add a status column (found / not_found / failed) to the CSV
        #[arg(long)]
        pub include_status: bool,

        /// Print the country codes available in the city dataset and exit
        #[arg(long)]
        pub list_countries: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,
    }

    // api_key 不可出現在 --verbose 日誌
    impl fmt::Debug for CliConfig {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("CliConfig")
                .field("cities", &self.cities)
                .field("country", &self.country)
                .field("seed", &self.seed)
                .field("market", &self.market)
                .field("source", &self.source)
                .field("api_key", &redact(self.api_key.as_deref()))
                .field("surfer_endpoint", &self.surfer_endpoint)
                .field("semrush_endpoint", &self.semrush_endpoint)
                .field("batch_size", &self.batch_size)
                .field("timeout_secs", &self.timeout_secs)
                .field("output_path", &self.output_path)
                .field("output_file", &self.output_file)
                .field("include_status", &self.include_status)
                .field("list_countries", &self.list_countries)
                .field("verbose", &self.verbose)
                .field("monitor", &self.monitor)
                .finish()
        }
    }

    impl ConfigProvider for CliConfig {
        fn cities_location(&self) -> &str {
            &self.cities
        }

        fn city_country(&self) -> Option<&str> {
            self.country.as_deref()
        }

        fn seed(&self) -> Option<&str> {
            self.seed.as_deref()
        }

        fn market(&self) -> Option<&str> {
            self.market.as_deref().or(self.country.as_deref())
        }

        fn source(&self) -> VolumeSourceKind {
            self.source
        }

        fn api_key(&self) -> Option<&str> {
            self.api_key.as_deref()
        }

        fn surfer_endpoint(&self) -> &str {
            &self.surfer_endpoint
        }

        fn semrush_endpoint(&self) -> &str {
            &self.semrush_endpoint
        }

        fn batch_size(&self) -> usize {
            self.batch_size
        }

        fn request_timeout(&self) -> Duration {
            Duration::from_secs(self.timeout_secs)
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_file(&self) -> &str {
            &self.output_file
        }

        fn include_status(&self) -> bool {
            self.include_status
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            if self.list_countries {
                validate_cities_location(self)?;
                return validate_positive_number("timeout_secs", self.timeout_secs, 1);
            }
            validate_run_settings(self)
        }
    }
}

/// 密鑰在 Debug 輸出中的替代字串
pub(crate) fn redact(secret: Option<&str>) -> Option<&'static str> {
    secret.map(|_| "***")
}

pub fn validate_cities_location<C: ConfigProvider>(config: &C) -> Result<()> {
    let location = config.cities_location();
    if is_remote(location) {
        validate_url("cities", location)
    } else {
        validate_path("cities", location)
    }
}

/// 開始抓取前檢查所有必要設定
pub fn validate_run_settings<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_cities_location(config)?;

    let seed = config.seed();
    validate_non_empty_string("seed", validate_required_field("seed", &seed)?)?;

    let country = config.city_country();
    validate_country_code("country", validate_required_field("country", &country)?)?;

    let market = config.market();
    validate_country_code("market", validate_required_field("market", &market)?)?;

    match config.source() {
        VolumeSourceKind::Surfer => validate_url("surfer_endpoint", config.surfer_endpoint())?,
        VolumeSourceKind::Semrush => {
            validate_url("semrush_endpoint", config.semrush_endpoint())?;
            let api_key = config.api_key();
            let key = *validate_required_field("api_key", &api_key)?;
            validate_non_empty_string("api_key", key)?;
            if key.starts_with("${") {
                return Err(KeywordError::ConfigValidationError {
                    field: "api_key".to_string(),
                    message: format!("environment variable {} is not set", key),
                });
            }
        }
    }

    validate_range("batch_size", config.batch_size(), 1, MAX_BATCH_SIZE)?;
    validate_positive_number("timeout_secs", config.request_timeout().as_secs(), 1)?;
    validate_path("output_path", config.output_path())?;
    validate_path("output_file", config.output_file())?;

    Ok(())
}
