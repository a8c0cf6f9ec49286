//! HTTP handler for the pro-content gateway.
//!
//! Request pipeline per `GET /content/{slug}`:
//! slug validation (no I/O before it) → session verification → entitlement
//! lookup → content fetch. Under the local development strategy the identity
//! and entitlement steps are skipped entirely. The handler only ever reads;
//! it never writes the entitlement store.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::domain::{ContentError, IdentityKey, Slug, StoreError};

use super::super::AppState;
use super::dto::{BundleResponse, ErrorResponse};

/// GET /content/{slug} - serve one pro bundle.
pub async fn get_bundle(
    State(state): State<AppState>,
    Path(raw_slug): Path<String>,
    headers: HeaderMap,
) -> Result<Json<BundleResponse>, GatewayError> {
    // Charset check comes first; nothing below runs for a bad slug.
    let slug = Slug::parse(&raw_slug).map_err(|_| GatewayError::InvalidSlug)?;

    if state.enforce_entitlement {
        authorize(&state, &headers).await?;
    }

    let bundle = state.content.fetch_bundle(&slug).await?;
    Ok(Json(BundleResponse::from(bundle)))
}

/// Resolves the caller to an entitled identity or fails with 401/403/500.
///
/// Entitlement is derived from the store and nowhere else: no header, cookie,
/// or body field the client sends can assert it.
async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), GatewayError> {
    let credential = bearer_token(headers).ok_or_else(|| {
        tracing::warn!("content request without session credential");
        GatewayError::Unauthenticated
    })?;

    let identity = state.sessions.verify(credential).await.map_err(|e| {
        tracing::warn!(error = %e, "content request with unverifiable session");
        GatewayError::Unauthenticated
    })?;

    let key = IdentityKey::new(&identity.email).map_err(|_| {
        tracing::warn!("session credential carries an empty email claim");
        GatewayError::Unauthenticated
    })?;

    match state.entitlements.get(&key).await? {
        Some(record) if record.grants_access() => Ok(()),
        _ => {
            tracing::debug!(identity = %key, "content request without entitlement");
            Err(GatewayError::NotEntitled)
        }
    }
}

/// Extracts the bearer credential from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Gateway failure, mapped onto the response taxonomy.
#[derive(Debug)]
pub enum GatewayError {
    /// Slug failed the charset check.
    InvalidSlug,
    /// No usable session credential.
    Unauthenticated,
    /// Authenticated but not entitled.
    NotEntitled,
    /// No bundle for the slug.
    NotFound,
    /// Store or content retrieval fault. Detail stays in the logs.
    Infrastructure(String),
}

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        // A store fault is 500, never 403: unavailability must not read as
        // "not entitled".
        GatewayError::Infrastructure(err.to_string())
    }
}

impl From<ContentError> for GatewayError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::NotFound => GatewayError::NotFound,
            ContentError::Infrastructure(detail) => GatewayError::Infrastructure(detail),
        }
    }
}

impl GatewayError {
    /// HTTP status for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidSlug => StatusCode::BAD_REQUEST,
            GatewayError::Unauthenticated => StatusCode::UNAUTHORIZED,
            GatewayError::NotEntitled => StatusCode::FORBIDDEN,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Infrastructure detail never crosses here.
    fn message(&self) -> &'static str {
        match self {
            GatewayError::InvalidSlug => "invalid slug",
            GatewayError::Unauthenticated => "authentication required",
            GatewayError::NotEntitled => "pro access required",
            GatewayError::NotFound => "not found",
            GatewayError::Infrastructure(_) => "internal error",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        if let GatewayError::Infrastructure(detail) = &self {
            tracing::error!(detail = %detail, "content request failed on infrastructure");
        }
        let body = ErrorResponse::new(self.message());
        (self.status_code(), Json(body)).into_response()
    }
}
