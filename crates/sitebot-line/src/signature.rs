//! Webhook signature verification.
//!
//! LINE signs every webhook delivery with HMAC-SHA256 over the raw request
//! body, keyed by the channel secret, and sends the base64 digest in the
//! `X-Line-Signature` header.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ring::hmac;

/// Verify a webhook signature against the raw request body.
///
/// Returns `false` for a malformed (non-base64) signature as well as a
/// mismatched one.  The comparison is constant-time.
pub fn validate_signature(channel_secret: &str, body: &[u8], signature_b64: &str) -> bool {
    let Ok(expected) = STANDARD.decode(signature_b64) else {
        return false;
    };

    let key = hmac::Key::new(hmac::HMAC_SHA256, channel_secret.as_bytes());
    hmac::verify(&key, body, &expected).is_ok()
}
