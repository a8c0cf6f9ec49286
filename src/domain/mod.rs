//! Domain layer: value objects, events, and error taxonomy.
//!
//! Everything here is infrastructure-free (the lone exception being the HTTP
//! status mapping on [`WebhookError`], which is part of the webhook contract
//! with the payment provider).

mod bundle;
mod entitlement;
mod errors;
mod identity;
mod payment_event;
mod signature;
mod slug;

pub use bundle::{BundleFile, ContentBundle, ContentError};
pub use entitlement::{Entitlement, IdentityKey, InvalidIdentityKey, PlanKind};
pub use errors::{StoreError, WebhookError};
pub use identity::{AuthError, Identity};
pub use payment_event::{PaymentEvent, PaymentEventKind, WebhookPayload, WebhookPayloadData};
pub use signature::SignatureVerifier;
pub use slug::{InvalidSlug, Slug};

#[cfg(test)]
pub use signature::sign_for_tests;
