use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ServiceError;
use crate::menu::store::MenuItem;

/// Persistence seam used by the HTTP router.
///
/// Bodies are passed through untouched; any rejection comes back as
/// [`ServiceError::Validation`] carrying the store's own message.
#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn list(&self) -> Vec<MenuItem>;
    async fn create(&self, body: Value) -> Result<MenuItem, ServiceError>;
    /// `Ok(None)` when no item has `id`.
    async fn update(&self, id: &str, body: Value) -> Result<Option<MenuItem>, ServiceError>;
    /// Removes the item if present; a missing id is not an error.
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
}
