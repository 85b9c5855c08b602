//! Call Repository Port
//!
//! Abstract interface for call record storage. The server keeps records in
//! memory for the process lifetime; a bounded or persistent backend can
//! replace it without touching the reconciliation rules.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, CallRecord};

/// Repository interface for CallRecord entities
#[async_trait]
pub trait CallRepository: Send + Sync {
    /// Find a call by its provider-assigned ID
    async fn find_by_id(&self, id: &str) -> Result<Option<CallRecord>, DomainError>;

    /// Find all calls, oldest first
    async fn find_all(&self) -> Result<Vec<CallRecord>, DomainError>;

    /// Save a call (insert or replace)
    async fn save(&self, call: &CallRecord) -> Result<(), DomainError>;

    /// Check whether a call is registered
    async fn exists(&self, id: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
