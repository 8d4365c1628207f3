use crate::domain::model::{KeywordVolume, VolumeResult, VolumeStatus};

/// Left join of `keywords` against `volumes`: one row per keyword, in input
/// order, volume 0 when nothing was returned for it.
pub fn merge(keywords: &[String], volumes: &VolumeResult) -> Vec<KeywordVolume> {
    keywords
        .iter()
        .map(|keyword| {
            let (volume, status) = match volumes.volume(keyword) {
                Some(v) => (v, VolumeStatus::Found),
                None if volumes.is_failed(keyword) => (0, VolumeStatus::Failed),
                None => (0, VolumeStatus::NotFound),
            };
            KeywordVolume {
                keyword: keyword.clone(),
                volume,
                status,
            }
        })
        .collect()
}
