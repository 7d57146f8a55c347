// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack request signature verification.
//!
//! Every request Slack sends carries `X-Slack-Request-Timestamp` and
//! `X-Slack-Signature` headers. The HMAC check itself is slack-morphism's
//! [`SlackEventSignatureVerifier`]; requests older than five minutes are
//! rejected here before it runs.

use std::sync::Arc;

use axum::http::HeaderMap;
use slack_morphism::prelude::SlackSigningSecret;
use slack_morphism::signature_verifier::SlackEventSignatureVerifier;
use tracing::debug;

pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

const MAX_AGE_SECS: i64 = 5 * 60;

/// Why a request was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing or unreadable header `{0}`")]
    MissingHeader(&'static str),
    #[error("request timestamp is outside the replay window")]
    Stale,
    #[error("signature does not match")]
    Mismatch,
}

/// Verifies requests against the app's signing secret.
#[derive(Clone)]
pub struct SigningSecret {
    verifier: Arc<SlackEventSignatureVerifier>,
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret([redacted])")
    }
}

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = SlackSigningSecret::new(secret.into());
        Self {
            verifier: Arc::new(SlackEventSignatureVerifier::new(&secret)),
        }
    }

    /// Check the signature headers of a request against `now` (unix seconds).
    pub fn verify(&self, headers: &HeaderMap, body: &[u8], now: i64) -> Result<(), SignatureError> {
        let timestamp = header(headers, TIMESTAMP_HEADER)?.to_string();
        let signature = header(headers, SIGNATURE_HEADER)?.to_string();

        let sent_at: i64 = timestamp.parse().map_err(|_| SignatureError::Stale)?;
        if (now - sent_at).abs() > MAX_AGE_SECS {
            return Err(SignatureError::Stale);
        }

        let body = String::from_utf8(body.to_vec()).map_err(|_| SignatureError::Mismatch)?;
        self.verifier
            .verify(&signature, &body, &timestamp)
            .map_err(|e| {
                debug!(error = ?e, "signature verification failed");
                SignatureError::Mismatch
            })
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, SignatureError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(SignatureError::MissingHeader(name))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    use super::*;

    const NOW: i64 = 1_531_420_618;

    fn sign(secret: &str, ts: &str, body: &[u8]) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("v0:{ts}:").as_bytes());
        mac.update(body);
        format!("v0={}", hex::encode(mac.finalize().into_bytes()))
    }

    fn signed(secret: &str, ts: &str, body: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from_str(ts).unwrap());
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_str(&sign(secret, ts, body)).unwrap(),
        );
        headers
    }

    #[test]
    fn known_signature_verifies() {
        // Worked example from Slack's request signing documentation.
        let secret = SigningSecret::new("8f742231b10e8888abcd99yyyzzz85a5");
        let body = b"token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&team_domain=testteamnow&channel_id=G8PSS9T3V&channel_name=foobar&user_id=U2CERLKJA&user_name=roadrunner&command=%2Fwebhook-collect&text=&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2FT1DC2JH3J%2F397700885554%2F96rGlfmibIGlgcZRskXaIFfN&trigger_id=398738663015.47445629121.803a0bc887a14d10d2c447fce8b6703c";
        let mut headers = HeaderMap::new();
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from_static("1531420618"));
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_static(
                "v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503",
            ),
        );
        assert_eq!(secret.verify(&headers, body, NOW), Ok(()));
    }

    #[test]
    fn tampered_body_is_rejected() {
        let secret = SigningSecret::new("s3cret");
        let headers = signed("s3cret", "1531420618", b"payload=a");
        assert_eq!(
            secret.verify(&headers, b"payload=b", NOW),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let headers = signed("one", "1531420618", b"x");
        assert_eq!(
            SigningSecret::new("two").verify(&headers, b"x", NOW),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn old_request_is_rejected() {
        let secret = SigningSecret::new("s3cret");
        let headers = signed("s3cret", "1531420618", b"x");
        assert_eq!(secret.verify(&headers, b"x", NOW + 299), Ok(()));
        assert_eq!(
            secret.verify(&headers, b"x", NOW + 301),
            Err(SignatureError::Stale)
        );
    }

    #[test]
    fn missing_headers_are_rejected() {
        let secret = SigningSecret::new("s3cret");
        assert_eq!(
            secret.verify(&HeaderMap::new(), b"x", NOW),
            Err(SignatureError::MissingHeader(TIMESTAMP_HEADER))
        );
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", SigningSecret::new("s3cret"));
        assert!(!rendered.contains("s3cret"));
    }
}
