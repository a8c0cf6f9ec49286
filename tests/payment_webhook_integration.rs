//! Integration tests for the payment webhook HTTP surface.
//!
//! These drive the full axum router with provider-shaped deliveries: HMAC
//! signing, tamper detection, the unconfigured-secret failure mode, and the
//! end-to-end grant/refund flow against the content gateway.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use hmac::{Hmac, Mac};
use http_body_util::BodyExt;
use secrecy::Secret;
use sha2::Sha256;
use tower::ServiceExt;

use stackgate::adapters::auth::MockSessionVerifier;
use stackgate::adapters::content::ContentSource;
use stackgate::adapters::http::{api_router, AppState, WebhookGuard};
use stackgate::adapters::memory::InMemoryEntitlementStore;
use stackgate::domain::SignatureVerifier;

const SECRET: &str = "whsec_integration_secret";

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Signs a body the way the payment provider does.
fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

fn guard() -> WebhookGuard {
    WebhookGuard::new(
        Some(SignatureVerifier::new(Secret::new(SECRET.to_string()))),
        None,
    )
}

/// Production-shaped wiring around an in-memory store; content comes from a
/// local tree so the gateway half of the flow needs no network.
fn app(
    root: &tempfile::TempDir,
    store: Arc<InMemoryEntitlementStore>,
    guard: WebhookGuard,
) -> axum::Router {
    let state = AppState {
        entitlements: store,
        sessions: Arc::new(MockSessionVerifier::new().with_user("tok", "a@x.com")),
        content: Arc::new(ContentSource::local(root.path())),
        webhook: guard,
        enforce_entitlement: true,
    };
    api_router().with_state(state)
}

fn content_root() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join("agent-starter")).unwrap();
    std::fs::write(root.path().join("agent-starter/agent.ts"), "export {};").unwrap();
    root
}

fn event_body(event_type: &str, email: &str) -> Vec<u8> {
    serde_json::json!({
        "type": event_type,
        "data": {
            "customer_email": email,
            "customer_id": "cus_42",
            "payment_id": "pay_42",
            "product_id": "prod_42"
        }
    })
    .to_string()
    .into_bytes()
}

fn signed_post(body: Vec<u8>) -> Request<Body> {
    let signature = sign(SECRET, &body);
    Request::builder()
        .method("POST")
        .uri("/webhooks/payment")
        .header("webhook-signature", signature)
        .body(Body::from(body))
        .unwrap()
}

fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

// =============================================================================
// Signature Verification
// =============================================================================

#[tokio::test]
async fn signed_delivery_is_acknowledged_with_plain_ok() {
    let root = content_root();
    let store = Arc::new(InMemoryEntitlementStore::new());

    let response = app(&root, store, guard())
        .oneshot(signed_post(event_body("payment.succeeded", "a@x.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");
}

#[tokio::test]
async fn flipping_any_byte_after_signing_fails_verification() {
    let root = content_root();
    let body = event_body("payment.succeeded", "a@x.com");
    let signature = sign(SECRET, &body);

    // Exhaustive per-byte check lives in the unit tests; spot-check a few
    // positions through the full HTTP stack.
    for index in [0, body.len() / 2, body.len() - 1] {
        let store = Arc::new(InMemoryEntitlementStore::new());
        let mut tampered = body.clone();
        tampered[index] ^= 0x01;
        let request = Request::builder()
            .method("POST")
            .uri("/webhooks/payment")
            .header("webhook-signature", signature.clone())
            .body(Body::from(tampered))
            .unwrap();

        let response = app(&root, store.clone(), guard()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "byte {index}");
        assert_eq!(store.len(), 0);
    }
}

#[tokio::test]
async fn unsigned_delivery_is_401() {
    let root = content_root();
    let request = Request::builder()
        .method("POST")
        .uri("/webhooks/payment")
        .body(Body::from(event_body("payment.succeeded", "a@x.com")))
        .unwrap();

    let response = app(&root, Arc::new(InMemoryEntitlementStore::new()), guard())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unset_secret_is_500_regardless_of_signature() {
    let root = content_root();
    let store = Arc::new(InMemoryEntitlementStore::new());

    let response = app(&root, store.clone(), WebhookGuard::disabled())
        .oneshot(signed_post(event_body("payment.succeeded", "a@x.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn signed_malformed_json_is_400() {
    let root = content_root();

    let response = app(&root, Arc::new(InMemoryEntitlementStore::new()), guard())
        .oneshot(signed_post(b"{\"type\": ".to_vec()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recognized_but_unhandled_event_types_are_acknowledged() {
    let root = content_root();
    let store = Arc::new(InMemoryEntitlementStore::new());

    let response = app(&root, store.clone(), guard())
        .oneshot(signed_post(event_body("checkout.created", "a@x.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.len(), 0);
}

// =============================================================================
// Grant / Revoke Flow
// =============================================================================

#[tokio::test]
async fn grant_then_fetch_then_refund_then_denied() {
    let root = content_root();
    let store = Arc::new(InMemoryEntitlementStore::new());

    // Before any payment: 403.
    let response = app(&root, store.clone(), guard())
        .oneshot(get_with_bearer("/content/agent-starter", "tok"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // payment.succeeded for a@x.com grants access.
    let response = app(&root, store.clone(), guard())
        .oneshot(signed_post(event_body("payment.succeeded", "a@x.com")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(&root, store.clone(), guard())
        .oneshot(get_with_bearer("/content/agent-starter", "tok"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // payment.refunded withdraws it again.
    let response = app(&root, store.clone(), guard())
        .oneshot(signed_post(event_body("payment.refunded", "a@x.com")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(&root, store.clone(), guard())
        .oneshot(get_with_bearer("/content/agent-starter", "tok"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn redelivered_grant_is_idempotent() {
    let root = content_root();
    let store = Arc::new(InMemoryEntitlementStore::new());
    let body = event_body("payment.succeeded", "a@x.com");

    for _ in 0..2 {
        let response = app(&root, store.clone(), guard())
            .oneshot(signed_post(body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn refund_for_unknown_identity_is_still_acknowledged() {
    let root = content_root();
    let store = Arc::new(InMemoryEntitlementStore::new());

    let response = app(&root, store.clone(), guard())
        .oneshot(signed_post(event_body("payment.refunded", "ghost@x.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.len(), 0);
}
