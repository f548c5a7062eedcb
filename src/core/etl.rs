use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting skill extraction run");

        let table = self.pipeline.extract().await?;
        tracing::info!("Extracted {} postings", table.postings.len());
        self.monitor.log_stats("Extract");

        let batch = self.pipeline.transform(table).await?;
        tracing::info!(
            "Tagged {} postings ({} without description)",
            batch.postings.len(),
            batch.missing_description
        );
        self.monitor.log_stats("Transform");

        let output_path = self.pipeline.load(batch).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
