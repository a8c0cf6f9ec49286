//! Applies verified payment events to the entitlement store.
//!
//! Idempotence rests on the store key being the identity, not the event id:
//! replaying a grant for an already-entitled identity with the same payment
//! reference changes nothing, and a revoke for an unknown identity is a
//! no-op. When grant and revoke race out of order for one identity, the last
//! event processed wins; there is no reconciliation beyond that.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Entitlement, PaymentEvent, PaymentEventKind, StoreError};
use crate::ports::EntitlementStore;

/// What applying an event did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Access granted (record created or replaced).
    Granted,
    /// Replayed grant for an already-entitled identity; record untouched.
    AlreadyGranted,
    /// Access withdrawn.
    Revoked,
    /// Revoke for an identity with no record; nothing to do.
    NoRecord,
}

/// Entitlement updater: the only writer of the entitlement store.
pub struct ApplyPaymentEventHandler {
    store: Arc<dyn EntitlementStore>,
}

impl ApplyPaymentEventHandler {
    /// Creates a handler over the given store.
    pub fn new(store: Arc<dyn EntitlementStore>) -> Self {
        Self { store }
    }

    /// Applies one event. Safe to call with redelivered events.
    ///
    /// # Errors
    ///
    /// Propagates `StoreError` so the webhook endpoint can answer 500 and let
    /// the provider retry delivery.
    pub async fn apply(&self, event: &PaymentEvent) -> Result<ApplyOutcome, StoreError> {
        match event.kind {
            PaymentEventKind::Granted => self.apply_grant(event).await,
            PaymentEventKind::Revoked => self.apply_revoke(event).await,
        }
    }

    async fn apply_grant(&self, event: &PaymentEvent) -> Result<ApplyOutcome, StoreError> {
        // A redelivered grant must leave the record byte-identical, so the
        // original activated_at is kept by skipping the write entirely.
        if let Some(existing) = self.store.get(&event.identity_key).await? {
            if existing.grants_access()
                && existing.external_payment_id == event.external_payment_id
            {
                tracing::debug!(identity = %event.identity_key, "grant replayed, record unchanged");
                return Ok(ApplyOutcome::AlreadyGranted);
            }
        }

        let record = Entitlement::granted(
            event.identity_key.clone(),
            event.external_customer_id.clone(),
            event.external_payment_id.clone(),
            Utc::now(),
        );
        self.store.upsert(&record).await?;
        tracing::info!(identity = %event.identity_key, "entitlement granted");
        Ok(ApplyOutcome::Granted)
    }

    async fn apply_revoke(&self, event: &PaymentEvent) -> Result<ApplyOutcome, StoreError> {
        match self.store.get(&event.identity_key).await? {
            None => {
                tracing::debug!(identity = %event.identity_key, "revoke for unknown identity, no-op");
                Ok(ApplyOutcome::NoRecord)
            }
            Some(mut record) => {
                record.revoke();
                self.store.upsert(&record).await?;
                tracing::info!(identity = %event.identity_key, "entitlement revoked");
                Ok(ApplyOutcome::Revoked)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryEntitlementStore;
    use crate::domain::{IdentityKey, PlanKind};

    fn grant_event(email: &str, payment_id: &str) -> PaymentEvent {
        PaymentEvent {
            kind: PaymentEventKind::Granted,
            identity_key: IdentityKey::new(email).unwrap(),
            external_customer_id: Some("cus_1".to_string()),
            external_payment_id: Some(payment_id.to_string()),
            external_product_id: Some("prod_1".to_string()),
        }
    }

    fn revoke_event(email: &str) -> PaymentEvent {
        PaymentEvent {
            kind: PaymentEventKind::Revoked,
            identity_key: IdentityKey::new(email).unwrap(),
            external_customer_id: Some("cus_1".to_string()),
            external_payment_id: Some("pay_refund".to_string()),
            external_product_id: Some("prod_1".to_string()),
        }
    }

    fn handler() -> (ApplyPaymentEventHandler, Arc<InMemoryEntitlementStore>) {
        let store = Arc::new(InMemoryEntitlementStore::new());
        (ApplyPaymentEventHandler::new(store.clone()), store)
    }

    #[tokio::test]
    async fn grant_creates_an_entitled_record() {
        let (handler, store) = handler();

        let outcome = handler.apply(&grant_event("a@x.com", "pay_1")).await.unwrap();

        assert_eq!(outcome, ApplyOutcome::Granted);
        let record = store
            .get(&IdentityKey::new("a@x.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(record.grants_access());
        assert_eq!(record.plan, PlanKind::Lifetime);
        assert_eq!(record.external_payment_id.as_deref(), Some("pay_1"));
    }

    #[tokio::test]
    async fn replayed_grant_leaves_the_record_identical() {
        let (handler, store) = handler();
        let key = IdentityKey::new("a@x.com").unwrap();

        handler.apply(&grant_event("a@x.com", "pay_1")).await.unwrap();
        let first = store.get(&key).await.unwrap().unwrap();

        let outcome = handler.apply(&grant_event("a@x.com", "pay_1")).await.unwrap();
        let second = store.get(&key).await.unwrap().unwrap();

        assert_eq!(outcome, ApplyOutcome::AlreadyGranted);
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn a_new_purchase_replaces_a_revoked_record() {
        let (handler, store) = handler();
        let key = IdentityKey::new("a@x.com").unwrap();

        handler.apply(&grant_event("a@x.com", "pay_1")).await.unwrap();
        handler.apply(&revoke_event("a@x.com")).await.unwrap();
        let outcome = handler.apply(&grant_event("a@x.com", "pay_2")).await.unwrap();

        assert_eq!(outcome, ApplyOutcome::Granted);
        let record = store.get(&key).await.unwrap().unwrap();
        assert!(record.grants_access());
        assert_eq!(record.external_payment_id.as_deref(), Some("pay_2"));
    }

    #[tokio::test]
    async fn revoke_after_grant_wins() {
        let (handler, store) = handler();
        let key = IdentityKey::new("a@x.com").unwrap();

        handler.apply(&grant_event("a@x.com", "pay_1")).await.unwrap();
        let outcome = handler.apply(&revoke_event("a@x.com")).await.unwrap();

        assert_eq!(outcome, ApplyOutcome::Revoked);
        let record = store.get(&key).await.unwrap().unwrap();
        assert!(!record.grants_access());
        assert_eq!(record.plan, PlanKind::None);
    }

    #[tokio::test]
    async fn revoke_for_unknown_identity_is_a_no_op() {
        let (handler, store) = handler();

        let outcome = handler.apply(&revoke_event("ghost@x.com")).await.unwrap();

        assert_eq!(outcome, ApplyOutcome::NoRecord);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn revoked_revoke_stays_revoked() {
        let (handler, store) = handler();
        let key = IdentityKey::new("a@x.com").unwrap();

        handler.apply(&grant_event("a@x.com", "pay_1")).await.unwrap();
        handler.apply(&revoke_event("a@x.com")).await.unwrap();
        let outcome = handler.apply(&revoke_event("a@x.com")).await.unwrap();

        assert_eq!(outcome, ApplyOutcome::Revoked);
        assert!(!store.get(&key).await.unwrap().unwrap().grants_access());
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let store = Arc::new(InMemoryEntitlementStore::new());
        store.fail_with("simulated outage");
        let handler = ApplyPaymentEventHandler::new(store);

        let result = handler.apply(&grant_event("a@x.com", "pay_1")).await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
