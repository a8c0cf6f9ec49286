//! Entitlement records: who has paid for pro content access.
//!
//! Records are keyed by the identity's email and carry the external payment
//! references that produced them. The `is_entitled == true` implies
//! `plan != PlanKind::None` invariant is enforced by the constructors here,
//! never left to callers.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Stable key into the entitlement store: the identity's email, normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(String);

/// Rejection for unusable identity keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("identity key cannot be empty")]
pub struct InvalidIdentityKey;

impl IdentityKey {
    /// Normalizes (trim, lowercase) and validates an identity key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentityKey` if the input is empty after trimming.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, InvalidIdentityKey> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(InvalidIdentityKey);
        }
        Ok(IdentityKey(normalized))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Plan attached to an entitlement record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    /// No plan; the record exists but grants nothing.
    None,
    /// One-time lifetime purchase.
    Lifetime,
}

impl PlanKind {
    /// Stable storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanKind::None => "none",
            PlanKind::Lifetime => "lifetime",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(PlanKind::None),
            "lifetime" => Some(PlanKind::Lifetime),
            _ => None,
        }
    }
}

/// Durable record of one identity's pro-content access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entitlement {
    pub identity_key: IdentityKey,
    pub is_entitled: bool,
    pub plan: PlanKind,
    pub activated_at: Option<DateTime<Utc>>,
    pub external_customer_id: Option<String>,
    pub external_payment_id: Option<String>,
}

impl Entitlement {
    /// Creates an entitled record from a successful payment.
    pub fn granted(
        identity_key: IdentityKey,
        external_customer_id: Option<String>,
        external_payment_id: Option<String>,
        activated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            identity_key,
            is_entitled: true,
            plan: PlanKind::Lifetime,
            activated_at: Some(activated_at),
            external_customer_id,
            external_payment_id,
        }
    }

    /// Withdraws access in place. External references are kept for audit.
    pub fn revoke(&mut self) {
        self.is_entitled = false;
        self.plan = PlanKind::None;
    }

    /// Whether this record currently grants pro-content access.
    pub fn grants_access(&self) -> bool {
        self.is_entitled
    }

    /// Checks the record invariant: entitled records always carry a plan.
    pub fn is_consistent(&self) -> bool {
        !self.is_entitled || self.plan != PlanKind::None
    }
}
