use async_trait::async_trait;

use crate::errors::Result;

/// Key-value persistence for the session credential.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_value(&self, key: &str) -> Result<Option<String>>;

    async fn set_value(&self, key: &str, value: &str) -> Result<()>;

    async fn delete_value(&self, key: &str) -> Result<()>;
}
