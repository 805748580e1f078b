use crate::domain::model::{HttpRequest, HttpResponse, StoredData};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Tag/value/date storage contract consumed by the application core.
pub trait StoragePort: Send + Sync {
    fn get(&self, tag: &str) -> impl std::future::Future<Output = Result<Option<StoredData>>> + Send;
    fn set(
        &self,
        tag: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<StoredData>> + Send;
    fn delete(&self, tag: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<StoredData>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn database_url(&self) -> &str;
    fn max_connections(&self) -> u32;
}

#[async_trait]
pub trait Application: Send + Sync {
    async fn handle_request(&self, request: HttpRequest) -> Result<HttpResponse>;
}
