//! Error taxonomy for webhook processing and the entitlement store.
//!
//! The three webhook failure classes the payment provider can trigger
//! (unconfigured secret, invalid signature, malformed payload) map to distinct
//! HTTP statuses and log levels and must never collapse into each other: an
//! unconfigured secret in particular is an operator fault, not a caller fault.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur while handling a payment webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The signing secret is not configured. Operator fault, not caller fault.
    #[error("webhook signing secret is not configured")]
    MissingSecret,

    /// Signature header missing, undecodable, or digest mismatch.
    #[error("invalid webhook signature")]
    InvalidSignature,

    /// Body failed to parse as JSON after the signature verified.
    #[error("malformed webhook payload: {0}")]
    ParseError(String),

    /// A recognized event is missing a field we require.
    #[error("webhook payload missing field: {0}")]
    MissingField(&'static str),

    /// Event type is recognized but intentionally not processed.
    #[error("event ignored: {0}")]
    Ignored(String),

    /// The entitlement store failed while applying the event.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WebhookError {
    /// Returns true if the provider should retry delivering this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::MissingSecret | WebhookError::Store(_))
    }

    /// Maps the error to the HTTP status returned to the provider.
    ///
    /// 2xx acknowledges the event, 4xx stops retries, 5xx requests a retry.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSecret => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,
            WebhookError::ParseError(_) | WebhookError::MissingField(_) => StatusCode::BAD_REQUEST,
            WebhookError::Ignored(_) => StatusCode::OK,
            WebhookError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Entitlement store failures.
///
/// Store unavailability is always an infrastructure error; it must never be
/// read as "no record" by callers deciding authorization.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store is unreachable or the operation failed.
    #[error("entitlement store unavailable: {0}")]
    Unavailable(String),

    /// A persisted row could not be mapped back into a domain record.
    #[error("corrupt entitlement record: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Creates an unavailability error with a message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable(message.into())
    }

    /// Creates a corrupt-record error with a message.
    pub fn corrupt(message: impl Into<String>) -> Self {
        StoreError::Corrupt(message.into())
    }
}
