pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use core::{etl::EtlEngine, pipeline::KeywordPipeline};
pub use domain::model::{KeywordVolume, VolumeSourceKind, VolumeStatus};
pub use utils::error::{KeywordError, Result};
