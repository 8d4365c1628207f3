use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 城市資料集中的一列，只保留城市名稱與國家代碼
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    pub city: String,
    pub country: String,
}

impl CityRecord {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }
}

/// 搜尋量來源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum VolumeSourceKind {
    /// Keyword Surfer (free)
    Surfer,
    /// Semrush (paid, needs an API key)
    Semrush,
}

impl VolumeSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeSourceKind::Surfer => "surfer",
            VolumeSourceKind::Semrush => "semrush",
        }
    }
}

impl std::fmt::Display for VolumeSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeStatus {
    Found,
    NotFound,
    Failed,
}

impl VolumeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeStatus::Found => "found",
            VolumeStatus::NotFound => "not_found",
            VolumeStatus::Failed => "failed",
        }
    }
}

/// 合併後的一列
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordVolume {
    pub keyword: String,
    pub volume: u64,
    pub status: VolumeStatus,
}

/// Accumulates what the volume services returned across every batch of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeResult {
    volumes: HashMap<String, u64>,
    failed_keywords: HashSet<String>,
    batches_total: usize,
    batches_failed: usize,
}

impl VolumeResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同一關鍵字重複回傳時，以最後一次為準
    pub fn record_batch(&mut self, volumes: HashMap<String, u64>) {
        self.batches_total += 1;
        self.volumes.extend(volumes);
    }

    pub fn record_failure(&mut self, batch: &[String]) {
        self.batches_total += 1;
        self.batches_failed += 1;
        self.failed_keywords.extend(batch.iter().cloned());
    }

    pub fn volume(&self, keyword: &str) -> Option<u64> {
        self.volumes.get(keyword).copied()
    }

    pub fn is_failed(&self, keyword: &str) -> bool {
        self.failed_keywords.contains(keyword)
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn batches_total(&self) -> usize {
        self.batches_total
    }

    pub fn batches_failed(&self) -> usize {
        self.batches_failed
    }
}

impl FromIterator<(String, u64)> for VolumeResult {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut result = VolumeResult::new();
        result.record_batch(iter.into_iter().collect());
        result
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub source: VolumeSourceKind,
    pub market: String,
    pub keywords: usize,
    pub batches_total: usize,
    pub batches_failed: usize,
    pub found: usize,
    pub not_found: usize,
    pub failed: usize,
    pub generated_at: DateTime<Utc>,
}

impl RunReport {
    pub fn from_rows(
        source: VolumeSourceKind,
        market: &str,
        rows: &[KeywordVolume],
        volumes: &VolumeResult,
    ) -> Self {
        let count = |status: VolumeStatus| rows.iter().filter(|r| r.status == status).count();
        Self {
            source,
            market: market.to_string(),
            keywords: rows.len(),
            batches_total: volumes.batches_total(),
            batches_failed: volumes.batches_failed(),
            found: count(VolumeStatus::Found),
            not_found: count(VolumeStatus::NotFound),
            failed: count(VolumeStatus::Failed),
            generated_at: Utc::now(),
        }
    }
}

/// transform 階段的輸出
#[derive(Debug, Clone)]
pub struct Dataset {
    pub rows: Vec<KeywordVolume>,
    pub report: RunReport,
}
