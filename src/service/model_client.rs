use async_trait::async_trait;

use crate::error::NexusError;

/// One remote generation call. Implementations do not retry on HTTP status;
/// the fallback policy decides what happens after an `Err`.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, NexusError>;
}
