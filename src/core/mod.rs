pub mod batch;
pub mod etl;
pub mod fetcher;
pub mod keywords;
pub mod merge;
pub mod pipeline;

pub use crate::domain::model::{Dataset, KeywordVolume, VolumeResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, ProgressReporter, Storage, VolumeSource};
pub use crate::utils::error::Result;
