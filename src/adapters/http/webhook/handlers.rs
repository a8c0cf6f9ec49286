//! HTTP handler for payment-provider webhooks.
//!
//! Order of checks is load-bearing: configured secret first (an unconfigured
//! secret is an operator fault and must answer 500, never masquerade as a
//! signature failure), then signature over the raw body, and only then JSON
//! parsing. Recognized-but-ignored event types are acknowledged with 200 so
//! the provider stops redelivering them.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::{ApplyOutcome, ApplyPaymentEventHandler};
use crate::domain::{PaymentEvent, WebhookError, WebhookPayload};

use super::super::content::ErrorResponse;
use super::super::AppState;

/// Header carrying the provider's HMAC digest.
const SIGNATURE_HEADER: &str = "webhook-signature";

/// POST /webhooks/payment - apply one payment event.
pub async fn handle_payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, WebhookApiError> {
    match process(&state, &headers, &body).await {
        Ok(outcome) => {
            tracing::info!(?outcome, "payment webhook processed");
            Ok("ok")
        }
        Err(WebhookError::Ignored(reason)) => {
            tracing::debug!(%reason, "payment webhook acknowledged without processing");
            Ok("ok")
        }
        Err(err) => Err(WebhookApiError(err)),
    }
}

async fn process(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<ApplyOutcome, WebhookError> {
    let verifier = state
        .webhook
        .verifier
        .as_ref()
        .ok_or(WebhookError::MissingSecret)?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookError::InvalidSignature)?;
    verifier.verify(body, signature)?;

    let payload = WebhookPayload::from_slice(body)?;
    let event = PaymentEvent::from_payload(&payload, state.webhook.product_filter.as_deref())?;

    let handler = ApplyPaymentEventHandler::new(state.entitlements.clone());
    Ok(handler.apply(&event).await?)
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Webhook failure carried to the HTTP boundary.
#[derive(Debug)]
pub struct WebhookApiError(pub WebhookError);

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            WebhookError::MissingSecret => {
                tracing::error!("webhook signing secret is not configured; rejecting delivery");
            }
            WebhookError::InvalidSignature => {
                tracing::warn!("payment webhook with invalid signature");
            }
            WebhookError::Store(err) => {
                tracing::error!(error = %err, "entitlement store failed during webhook");
            }
            WebhookError::ParseError(detail) => {
                tracing::debug!(%detail, "payment webhook with malformed payload");
            }
            WebhookError::MissingField(field) => {
                tracing::debug!(%field, "payment webhook missing required field");
            }
            WebhookError::Ignored(_) => {}
        }

        let status = self.0.status_code();
        if status == StatusCode::OK {
            return (status, "ok").into_response();
        }
        let body = ErrorResponse::new(self.0.to_string());
        (status, Json(body)).into_response()
    }
}
