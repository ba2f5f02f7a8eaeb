use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting batch run");

        // Extract
        let table = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} rows ({} columns)",
            table.rows.len(),
            table.headers.len()
        );

        // Transform
        let result = self.pipeline.transform(table).await?;
        tracing::info!(
            "Transformed {} rows: {} matched a known location, {} used the default rate",
            result.processed,
            result.matched,
            result.defaulted
        );

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
