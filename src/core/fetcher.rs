use crate::domain::model::VolumeResult;
use crate::domain::ports::{ProgressReporter, VolumeSource};

/// 以 tracing 輸出進度
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, fraction: f64) {
        tracing::info!("⏳ Extraction progress: {:.0}%", fraction * 100.0);
    }
}

/// Queries `source` once per batch, in order, and folds every answer into
/// `acc`. A failing batch is logged and counted in `acc`; the loop always
/// runs to the last batch.
pub async fn fetch_volumes(
    source: &dyn VolumeSource,
    batches: &[&[String]],
    progress: &dyn ProgressReporter,
    acc: &mut VolumeResult,
) {
    let total = batches.len();

    for (index, batch) in batches.iter().enumerate() {
        tracing::debug!(
            "📦 {}: batch {}/{} ({} keywords)",
            source.name(),
            index + 1,
            total,
            batch.len()
        );

        match source.fetch_batch(batch).await {
            Ok(volumes) => {
                tracing::debug!(
                    "{}: batch {} returned {} volumes",
                    source.name(),
                    index + 1,
                    volumes.len()
                );
                acc.record_batch(volumes);
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ {}: batch {}/{} skipped: {}",
                    source.name(),
                    index + 1,
                    total,
                    e
                );
                acc.record_failure(batch);
            }
        }

        progress.report((index + 1) as f64 / total as f64);
    }

    if total == 0 {
        progress.report(1.0);
    }

    if acc.batches_failed() > 0 {
        tracing::warn!(
            "{} of {} batches failed; their keywords are reported with volume 0",
            acc.batches_failed(),
            acc.batches_total()
        );
    }
}
