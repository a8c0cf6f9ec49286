//! Payment webhook payloads and the events distilled from them.
//!
//! The provider payload is untrusted input; it is parsed only after signature
//! verification, reduced to a [`PaymentEvent`], applied, and discarded. Only
//! its effects persist, in the entitlement record.

use serde::Deserialize;

use super::entitlement::IdentityKey;
use super::errors::WebhookError;

/// Raw webhook payload shape from the payment provider.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    /// Provider event type, e.g. "payment.succeeded".
    #[serde(rename = "type")]
    pub event_type: String,

    /// Event-specific data.
    pub data: WebhookPayloadData,
}

/// Data object carried by every payment event we consume.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayloadData {
    pub customer_email: Option<String>,
    pub customer_id: Option<String>,
    pub payment_id: Option<String>,
    pub product_id: Option<String>,
}

impl WebhookPayload {
    /// Parses a verified raw body into a payload.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ParseError` if the body is not valid JSON of
    /// the expected shape.
    pub fn from_slice(body: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(body).map_err(|e| WebhookError::ParseError(e.to_string()))
    }
}

/// What a payment event does to an entitlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentEventKind {
    /// A completed purchase: grant access.
    Granted,
    /// A refund or chargeback: withdraw access.
    Revoked,
}

impl PaymentEventKind {
    /// Maps a provider event type onto a kind. `None` means the type is
    /// acknowledged but not processed.
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "payment.succeeded" | "order.paid" => Some(PaymentEventKind::Granted),
            "payment.refunded" | "order.refunded" => Some(PaymentEventKind::Revoked),
            _ => None,
        }
    }
}

/// Verified, normalized payment event ready to apply to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentEvent {
    pub kind: PaymentEventKind,
    pub identity_key: IdentityKey,
    pub external_customer_id: Option<String>,
    pub external_payment_id: Option<String>,
    pub external_product_id: Option<String>,
}

impl PaymentEvent {
    /// Distills a parsed payload into an event.
    ///
    /// `product_filter`, when configured, restricts processing to one product:
    /// events for any other product are ignored rather than rejected, since
    /// the provider fans out every product's events to the same endpoint.
    ///
    /// # Errors
    ///
    /// - `WebhookError::Ignored` for unrecognized event types or filtered
    ///   products (acknowledged with 200, never retried);
    /// - `WebhookError::MissingField` when a recognized event lacks the
    ///   customer email that keys the entitlement.
    pub fn from_payload(
        payload: &WebhookPayload,
        product_filter: Option<&str>,
    ) -> Result<Self, WebhookError> {
        let kind = PaymentEventKind::from_event_type(&payload.event_type).ok_or_else(|| {
            WebhookError::Ignored(format!("unhandled event type: {}", payload.event_type))
        })?;

        if let (Some(expected), Some(actual)) = (product_filter, payload.data.product_id.as_deref())
        {
            if expected != actual {
                return Err(WebhookError::Ignored(format!(
                    "event for foreign product: {}",
                    actual
                )));
            }
        }

        let email = payload
            .data
            .customer_email
            .as_deref()
            .ok_or(WebhookError::MissingField("customer_email"))?;
        let identity_key =
            IdentityKey::new(email).map_err(|_| WebhookError::MissingField("customer_email"))?;

        Ok(PaymentEvent {
            kind,
            identity_key,
            external_customer_id: payload.data.customer_id.clone(),
            external_payment_id: payload.data.payment_id.clone(),
            external_product_id: payload.data.product_id.clone(),
        })
    }
}
