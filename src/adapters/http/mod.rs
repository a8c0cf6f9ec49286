//! HTTP adapters: shared state and the top-level router.

pub mod content;
pub mod webhook;

use std::sync::Arc;

use axum::Router;

use crate::adapters::content::ContentSource;
use crate::domain::SignatureVerifier;
use crate::ports::{EntitlementStore, SessionVerifier};

/// Webhook-side dependencies, fixed at startup.
///
/// `verifier` is `None` when no signing secret is configured; deliveries then
/// answer 500 until an operator fixes the deployment.
#[derive(Clone)]
pub struct WebhookGuard {
    pub verifier: Option<Arc<SignatureVerifier>>,
    /// When set, events for other products are acknowledged but not applied.
    pub product_filter: Option<String>,
}

impl WebhookGuard {
    /// Creates a guard for the given secret and optional product filter.
    pub fn new(verifier: Option<SignatureVerifier>, product_filter: Option<String>) -> Self {
        Self {
            verifier: verifier.map(Arc::new),
            product_filter,
        }
    }

    /// A guard with no secret configured. Deliveries answer 500.
    pub fn disabled() -> Self {
        Self {
            verifier: None,
            product_filter: None,
        }
    }
}

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub entitlements: Arc<dyn EntitlementStore>,
    pub sessions: Arc<dyn SessionVerifier>,
    pub content: Arc<ContentSource>,
    pub webhook: WebhookGuard,
    /// False only under the local development strategy, where the gateway
    /// serves without identity or entitlement checks.
    pub enforce_entitlement: bool,
}

impl AppState {
    /// Wires the state, deriving entitlement enforcement from the content
    /// strategy: local root configured means development, checks off.
    pub fn new(
        entitlements: Arc<dyn EntitlementStore>,
        sessions: Arc<dyn SessionVerifier>,
        content: Arc<ContentSource>,
        webhook: WebhookGuard,
    ) -> Self {
        let enforce_entitlement = !content.is_local();
        Self {
            entitlements,
            sessions,
            content,
            webhook,
            enforce_entitlement,
        }
    }
}

/// The complete API router: content gateway plus payment webhooks.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/content", content::content_routes())
        .nest("/webhooks", webhook::webhook_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionVerifier;
    use crate::adapters::memory::InMemoryEntitlementStore;
    use secrecy::Secret;

    fn state(content: ContentSource) -> AppState {
        AppState::new(
            Arc::new(InMemoryEntitlementStore::new()),
            Arc::new(MockSessionVerifier::new()),
            Arc::new(content),
            WebhookGuard::disabled(),
        )
    }

    #[test]
    fn local_strategy_disables_enforcement() {
        assert!(!state(ContentSource::local("/tmp/stacks")).enforce_entitlement);
    }

    #[test]
    fn remote_strategy_enables_enforcement() {
        let content = ContentSource::remote("acme/pro-stacks", Secret::new("ghp_x".to_string()));
        assert!(state(content).enforce_entitlement);
    }

    #[test]
    fn api_router_builds() {
        let router = api_router();
        let _: Router<()> = router.with_state(state(ContentSource::local("/tmp/stacks")));
    }
}
