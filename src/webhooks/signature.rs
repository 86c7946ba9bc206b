//! Webhook payload authentication.
//!
//! The code host signs each delivery with HMAC-SHA256 over the raw body using
//! the shared webhook secret, and sends the result in `X-Hub-Signature-256`
//! as `sha256=<hex>`. Verification runs on the raw bytes before anything
//! looks at the payload.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Decodes a `sha256=<hex>` header value into the raw MAC bytes.
///
/// Returns `None` when the prefix is missing or the hex is malformed.
///
/// # Examples
///
/// ```
/// use issue_bridge::webhooks::parse_signature_header;
///
/// assert_eq!(parse_signature_header("sha256=0a0b"), Some(vec![0x0a, 0x0b]));
/// assert!(parse_signature_header("sha1=0a0b").is_none());
/// assert!(parse_signature_header("sha256=zz").is_none());
/// ```
pub fn parse_signature_header(header: &str) -> Option<Vec<u8>> {
    hex::decode(header.strip_prefix("sha256=")?).ok()
}

/// Returns the `sha256=<hex>` header value for `payload` signed with `secret`.
///
/// This is what the code host sends; tests use it to build deliveries.
pub fn sign_payload(payload: &[u8], secret: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload);
    Some(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

/// Checks `signature_header` against the HMAC-SHA256 of `payload`.
///
/// A missing prefix, bad hex, or wrong MAC all yield `false`. The MAC
/// comparison is constant time.
///
/// # Examples
///
/// ```
/// use issue_bridge::webhooks::{sign_payload, verify_signature};
///
/// let body = br#"{"zen":"Keep it logically awesome."}"#;
/// let header = sign_payload(body, b"hook-secret").unwrap();
///
/// assert!(verify_signature(body, &header, b"hook-secret"));
/// assert!(!verify_signature(body, &header, b"other-secret"));
/// ```
pub fn verify_signature(payload: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    let Some(expected) = parse_signature_header(signature_header) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload);

    mac.verify_slice(&expected).is_ok()
}
