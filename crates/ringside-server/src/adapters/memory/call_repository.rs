//! In-memory implementation of CallRepository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use ringside::{CallRecord, CallRepository, DomainError};

/// Process-lifetime call store.
///
/// Records are never evicted. Uses `std::sync::RwLock`: every critical
/// section is a plain HashMap operation that never spans an `.await`.
#[derive(Default)]
pub struct InMemoryCallRepository {
    calls: RwLock<HashMap<String, CallRecord>>,
}

impl InMemoryCallRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> DomainError {
    DomainError::Repository("call store lock poisoned".to_string())
}

#[async_trait]
impl CallRepository for InMemoryCallRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<CallRecord>, DomainError> {
        let calls = self.calls.read().map_err(poisoned)?;
        Ok(calls.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<CallRecord>, DomainError> {
        let calls = self.calls.read().map_err(poisoned)?;
        let mut all: Vec<CallRecord> = calls.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn save(&self, call: &CallRecord) -> Result<(), DomainError> {
        let mut calls = self.calls.write().map_err(poisoned)?;
        calls.insert(call.id.clone(), call.clone());
        Ok(())
    }

    async fn exists(&self, id: &str) -> Result<bool, DomainError> {
        let calls = self.calls.read().map_err(poisoned)?;
        Ok(calls.contains_key(id))
    }
}
