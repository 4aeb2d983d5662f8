//! Signature verification for the third-party login widget.
//!
//! The widget signs its payload with HMAC-SHA256 keyed by the SHA-256
//! digest of the application's shared secret. The signed input is a
//! canonical "data-check string": every non-empty field except the
//! signature itself, serialized `key=value`, keys sorted
//! lexicographically, joined with newlines.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Payload delivered by the login widget after an external sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginWidgetPayload {
    /// Numeric id on the external identity provider's side
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub photo_url: Option<String>,
    /// Unix timestamp of the external sign-in
    pub auth_date: i64,
    /// Lower-case hex HMAC provided by the widget
    pub hash: String,
}

impl LoginWidgetPayload {
    fn data_check_string(&self) -> String {
        let mut fields: Vec<(&str, String)> = vec![
            ("auth_date", self.auth_date.to_string()),
            ("id", self.id.to_string()),
        ];

        for (key, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("photo_url", &self.photo_url),
            ("username", &self.username),
        ] {
            if let Some(value) = value {
                if !value.is_empty() {
                    fields.push((key, value.clone()));
                }
            }
        }

        fields.sort_by(|a, b| a.0.cmp(b.0));

        fields
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Compute the expected signature for a payload. None when the key
/// setup fails (empty secrets never get this far).
fn expected_signature(payload: &LoginWidgetPayload, shared_secret: &str) -> Option<String> {
    // The shared secret is never used directly as the HMAC key
    let secret_key = Sha256::digest(shared_secret.as_bytes());
    let mut mac = HmacSha256::new_from_slice(secret_key.as_slice()).ok()?;
    mac.update(payload.data_check_string().as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Verify the widget signature against the shared secret.
///
/// Pure function: a missing secret or any mismatch returns false, never
/// an error.
pub fn verify_widget_signature(payload: &LoginWidgetPayload, shared_secret: &str) -> bool {
    if shared_secret.is_empty() {
        return false;
    }

    let Some(expected) = expected_signature(payload, shared_secret) else {
        return false;
    };

    if expected.len() != payload.hash.len() {
        return false;
    }

    expected.as_bytes().ct_eq(payload.hash.as_bytes()).into()
}
