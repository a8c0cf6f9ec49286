//! Payment webhook signature verification.
//!
//! The provider signs the raw request body with HMAC-SHA256 under a shared
//! secret and sends the hex digest in the `webhook-signature` header, with an
//! optional `sha256=` prefix. Digests are compared in constant time so a
//! mismatch reveals nothing about how many leading bytes matched.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::WebhookError;

/// Verifier bound to one configured signing secret.
pub struct SignatureVerifier {
    secret: Secret<String>,
}

impl SignatureVerifier {
    /// Creates a verifier with the given signing secret.
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret }
    }

    /// Verifies a signature header against the raw request body.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidSignature` if the header is not valid
    /// hex or the digest does not match. Parsing of the body happens
    /// elsewhere, after this check passes.
    pub fn verify(&self, payload: &[u8], signature_header: &str) -> Result<(), WebhookError> {
        let presented = signature_header
            .strip_prefix("sha256=")
            .unwrap_or(signature_header);
        let presented = hex::decode(presented).map_err(|_| WebhookError::InvalidSignature)?;

        let expected = self.compute_digest(payload);

        if !constant_time_compare(&expected, &presented) {
            return Err(WebhookError::InvalidSignature);
        }
        Ok(())
    }

    /// Computes the HMAC-SHA256 digest of the payload under the secret.
    fn compute_digest(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Signs a payload the way the provider would. Test fixtures only.
#[cfg(test)]
pub fn sign_for_tests(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "whsec_test_secret_12345";

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new(Secret::new(TEST_SECRET.to_string()))
    }

    #[test]
    fn accepts_a_valid_signature() {
        let payload = br#"{"type":"payment.succeeded"}"#;
        let signature = sign_for_tests(TEST_SECRET, payload);

        assert!(verifier().verify(payload, &signature).is_ok());
    }

    #[test]
    fn accepts_the_sha256_prefixed_form() {
        let payload = br#"{"type":"payment.succeeded"}"#;
        let signature = format!("sha256={}", sign_for_tests(TEST_SECRET, payload));

        assert!(verifier().verify(payload, &signature).is_ok());
    }

    #[test]
    fn rejects_a_signature_from_the_wrong_secret() {
        let payload = br#"{"type":"payment.succeeded"}"#;
        let signature = sign_for_tests("some_other_secret", payload);

        assert!(matches!(
            verifier().verify(payload, &signature),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn rejects_every_single_byte_flip_of_the_payload() {
        let payload = br#"{"type":"payment.succeeded","data":{"customer_email":"a@x.com"}}"#.to_vec();
        let signature = sign_for_tests(TEST_SECRET, &payload);
        let v = verifier();

        for i in 0..payload.len() {
            let mut tampered = payload.clone();
            tampered[i] ^= 0x01;
            assert!(
                matches!(v.verify(&tampered, &signature), Err(WebhookError::InvalidSignature)),
                "byte {} flip was not detected",
                i
            );
        }
    }

    #[test]
    fn rejects_non_hex_headers() {
        let payload = b"{}";
        assert!(matches!(
            verifier().verify(payload, "not-hex-at-all"),
            Err(WebhookError::InvalidSignature)
        ));
        assert!(matches!(
            verifier().verify(payload, ""),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn rejects_truncated_digests() {
        let payload = b"{}";
        let signature = sign_for_tests(TEST_SECRET, payload);
        let truncated = &signature[..signature.len() - 2];

        assert!(matches!(
            verifier().verify(payload, truncated),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn constant_time_compare_handles_lengths_and_content() {
        assert!(constant_time_compare(b"abc", b"abc"));
        assert!(!constant_time_compare(b"abc", b"abd"));
        assert!(!constant_time_compare(b"abc", b"abcd"));
        assert!(constant_time_compare(b"", b""));
    }
}
