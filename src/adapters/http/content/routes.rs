//! Router for the content gateway.

use axum::{routing::get, Router};

use super::super::AppState;
use super::handlers::get_bundle;

/// Routes mounted under `/content`.
///
/// - `GET /{slug}` - serve one pro bundle
pub fn content_routes() -> Router<AppState> {
    Router::new().route("/:slug", get(get_bundle))
}
