//! Router for payment webhooks.
//!
//! Separate from the content routes: webhook deliveries carry no user
//! session and are authenticated by signature instead.

use axum::{routing::post, Router};

use super::super::AppState;
use super::handlers::handle_payment_webhook;

/// Routes mounted under `/webhooks`.
///
/// - `POST /payment` - apply one payment event
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/payment", post(handle_payment_webhook))
}
