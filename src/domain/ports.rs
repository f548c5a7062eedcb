use crate::domain::model::{PostingTable, ProcessedBatch};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Postings table to read, relative to the storage root.
    fn input_file(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn compress_output(&self) -> bool;
    fn top_skills_limit(&self) -> usize;
    /// Number of blocking tasks the transform phase splits postings across.
    fn workers(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<PostingTable>;
    async fn transform(&self, table: PostingTable) -> Result<ProcessedBatch>;
    async fn load(&self, batch: ProcessedBatch) -> Result<String>;
}
