use crate::domain::model::{Table, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A scalar function as a host query engine sees it: a registration name and
/// one evaluation entry point over dynamically typed argument values.
pub trait ScalarFunction: Send + Sync {
    fn name(&self) -> &str;
    fn invoke(&self, args: &[serde_json::Value]) -> Result<serde_json::Value>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn location_column(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn rate_column(&self) -> &str;
    fn delimiter(&self) -> u8;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Table>;
    async fn transform(&self, table: Table) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
