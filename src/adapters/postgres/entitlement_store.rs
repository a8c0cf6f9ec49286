//! PostgreSQL implementation of the `EntitlementStore` port.
//!
//! One row per identity in the `entitlements` table; writes go through a
//! single `ON CONFLICT` upsert so concurrent webhook deliveries for the same
//! identity resolve to last-writer-wins without application-level locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Entitlement, IdentityKey, PlanKind, StoreError};
use crate::ports::EntitlementStore;

/// sqlx-backed entitlement store.
pub struct PostgresEntitlementStore {
    pool: PgPool,
}

impl PostgresEntitlementStore {
    /// Creates a store over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an entitlement.
#[derive(Debug, sqlx::FromRow)]
struct EntitlementRow {
    identity_key: String,
    is_entitled: bool,
    plan: String,
    activated_at: Option<DateTime<Utc>>,
    external_customer_id: Option<String>,
    external_payment_id: Option<String>,
}

impl TryFrom<EntitlementRow> for Entitlement {
    type Error = StoreError;

    fn try_from(row: EntitlementRow) -> Result<Self, Self::Error> {
        let identity_key = IdentityKey::new(&row.identity_key)
            .map_err(|e| StoreError::corrupt(format!("identity_key: {}", e)))?;
        let plan = PlanKind::parse(&row.plan)
            .ok_or_else(|| StoreError::corrupt(format!("unknown plan value: {}", row.plan)))?;

        Ok(Entitlement {
            identity_key,
            is_entitled: row.is_entitled,
            plan,
            activated_at: row.activated_at,
            external_customer_id: row.external_customer_id,
            external_payment_id: row.external_payment_id,
        })
    }
}

#[async_trait]
impl EntitlementStore for PostgresEntitlementStore {
    async fn get(&self, key: &IdentityKey) -> Result<Option<Entitlement>, StoreError> {
        let row: Option<EntitlementRow> = sqlx::query_as(
            r#"
            SELECT identity_key, is_entitled, plan, activated_at,
                   external_customer_id, external_payment_id
            FROM entitlements
            WHERE identity_key = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::unavailable(e.to_string()))?;

        row.map(Entitlement::try_from).transpose()
    }

    async fn upsert(&self, record: &Entitlement) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO entitlements (
                identity_key, is_entitled, plan, activated_at,
                external_customer_id, external_payment_id, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, now())
            ON CONFLICT (identity_key) DO UPDATE SET
                is_entitled = EXCLUDED.is_entitled,
                plan = EXCLUDED.plan,
                activated_at = EXCLUDED.activated_at,
                external_customer_id = EXCLUDED.external_customer_id,
                external_payment_id = EXCLUDED.external_payment_id,
                updated_at = now()
            "#,
        )
        .bind(record.identity_key.as_str())
        .bind(record.is_entitled)
        .bind(record.plan.as_str())
        .bind(record.activated_at)
        .bind(&record.external_customer_id)
        .bind(&record.external_payment_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::unavailable(e.to_string()))?;

        Ok(())
    }
}
