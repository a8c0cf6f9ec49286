//! In-memory entitlement store.
//!
//! Used by the test suite and available for local development when no
//! database is running. Supports forcing failures to exercise the
//! infrastructure-error paths.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{Entitlement, IdentityKey, StoreError};
use crate::ports::EntitlementStore;

/// `HashMap`-backed store with the same last-writer-wins semantics as the
/// Postgres adapter.
#[derive(Debug, Default)]
pub struct InMemoryEntitlementStore {
    records: RwLock<HashMap<IdentityKey, Entitlement>>,
    /// When set, every operation fails with this message.
    force_failure: RwLock<Option<String>>,
}

impl InMemoryEntitlementStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a record.
    pub fn with_record(self, record: Entitlement) -> Self {
        self.records
            .write()
            .unwrap()
            .insert(record.identity_key.clone(), record);
        self
    }

    /// Forces all subsequent operations to fail, for error-path tests.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.force_failure.write().unwrap() = Some(message.into());
    }

    /// Clears a forced failure.
    pub fn clear_failure(&self) {
        *self.force_failure.write().unwrap() = None;
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        match self.force_failure.read().unwrap().as_ref() {
            Some(message) => Err(StoreError::unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EntitlementStore for InMemoryEntitlementStore {
    async fn get(&self, key: &IdentityKey) -> Result<Option<Entitlement>, StoreError> {
        self.check_failure()?;
        Ok(self.records.read().unwrap().get(key).cloned())
    }

    async fn upsert(&self, record: &Entitlement) -> Result<(), StoreError> {
        self.check_failure()?;
        self.records
            .write()
            .unwrap()
            .insert(record.identity_key.clone(), record.clone());
        Ok(())
    }
}
