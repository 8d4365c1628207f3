use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: RunMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: RunMonitor::new(monitor_enabled),
        }
    }

    /// 依序執行 extract → transform → load，回傳 CSV 輸出路徑
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting keyword extraction...");

        // Extract
        let keywords = self.pipeline.extract().await?;
        tracing::info!("📝 Generated {} keywords", keywords.len());
        self.monitor.log_phase("Extract");

        // Transform
        let dataset = self.pipeline.transform(keywords).await?;
        tracing::info!(
            "Fetched volumes for {} keywords ({}/{} batches failed)",
            dataset.report.keywords,
            dataset.report.batches_failed,
            dataset.report.batches_total
        );
        self.monitor.log_phase("Transform");

        // Load
        let output_path = self.pipeline.load(dataset).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_phase("Load");
        self.monitor.log_final();

        Ok(output_path)
    }
}
