//! Entitlement store port.
//!
//! One record per identity, keyed by normalized email. Updates are
//! last-writer-wins per key; idempotence is the updater's concern (events are
//! keyed by identity, not by event id), so the store needs no concurrency
//! control beyond atomic per-key upserts.

use async_trait::async_trait;

use crate::domain::{Entitlement, IdentityKey, StoreError};

/// Durable keyed storage for entitlement records.
///
/// # Contract
///
/// - `get` returns `Ok(None)` for identities with no record; store
///   unavailability is `Err(StoreError)`, never `Ok(None)`. Callers deciding
///   authorization must be able to tell "no record" from "store down".
/// - `upsert` inserts or fully replaces the record for its key, atomically.
#[async_trait]
pub trait EntitlementStore: Send + Sync {
    /// Looks up the record for an identity.
    async fn get(&self, key: &IdentityKey) -> Result<Option<Entitlement>, StoreError>;

    /// Inserts or replaces the record for `record.identity_key`.
    async fn upsert(&self, record: &Entitlement) -> Result<(), StoreError>;
}
