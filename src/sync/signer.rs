//! # Payload Signer
//!
//! HMAC-SHA256 over a canonical JSON encoding, keyed with the site's
//! destination secret. Signer and verifier share the same encoding, so the
//! same logical payload always produces identical MAC input bytes.
//!
//! Canonical form: object keys sorted bytewise ascending, array order kept,
//! scalars rendered by serde_json's standard encoder, no insignificant
//! whitespace.

use hmac::{Hmac, Mac};
use serde_json::Value as JsonValue;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur while producing a signature
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("failed to initialize MAC from destination secret")]
    InvalidKey,
}

/// Render a JSON value in canonical form.
pub fn canonical_json(value: &JsonValue) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &JsonValue, out: &mut String) {
    match value {
        JsonValue::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();

            out.push('{');
            for (index, key) in keys.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(&JsonValue::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[*key], out);
            }
            out.push('}');
        }
        JsonValue::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Compute the hex-encoded HMAC-SHA256 of the payload's canonical encoding.
pub fn sign(payload: &JsonValue, secret: &str) -> Result<String, SignerError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignerError::InvalidKey)?;
    mac.update(canonical_json(payload).as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a candidate signature against the payload and secret.
///
/// Returns `false` on any mismatch, malformed hex, length mismatch, or MAC
/// initialization failure; it never returns an error. Comparison is
/// constant-time to prevent timing attacks on the MAC.
pub fn verify(payload: &JsonValue, secret: &str, candidate: &str) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(canonical_json(payload).as_bytes());
    let expected = mac.finalize().into_bytes();

    let Ok(provided) = hex::decode(candidate) else {
        return false;
    };

    let expected_bytes: &[u8] = expected.as_ref();
    subtle::ConstantTimeEq::ct_eq(expected_bytes, &provided[..]).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sign_verify_round_trip() {
        let payload = json!({
            "headline": "Summer Sale",
            "cta_url": "https://example.com/sale",
            "discount": 20,
            "tags": ["seasonal", "featured"],
        });
        let secret = "super-secret-key";

        let signature = sign(&payload, secret).unwrap();
        assert!(verify(&payload, secret, &signature));
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let payload = json!({"headline": "Summer Sale"});
        let secret = "super-secret-key";
        let signature = sign(&payload, secret).unwrap();

        let tampered = json!({"headline": "Winter Sale"});
        assert!(!verify(&tampered, secret, &signature));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let payload = json!({"headline": "Summer Sale"});
        let signature = sign(&payload, "secret-a").unwrap();

        assert!(!verify(&payload, "secret-b", &signature));
    }

    #[test]
    fn malformed_signature_returns_false_not_error() {
        let payload = json!({"headline": "Summer Sale"});

        assert!(!verify(&payload, "secret", "not hex at all"));
        assert!(!verify(&payload, "secret", ""));
        assert!(!verify(&payload, "secret", "deadbeef")); // wrong length
    }

    #[test]
    fn mutated_signature_byte_fails_verification() {
        let payload = json!({"headline": "Summer Sale"});
        let secret = "super-secret-key";
        let mut signature = sign(&payload, secret).unwrap();

        // Flip the first hex digit
        let first = signature.remove(0);
        let flipped = if first == '0' { '1' } else { '0' };
        signature.insert(0, flipped);

        assert!(!verify(&payload, secret, &signature));
    }

    #[test]
    fn canonical_encoding_sorts_object_keys() {
        let value = json!({"zebra": 1, "apple": {"nested_z": true, "nested_a": false}, "mango": [3, 2, 1]});

        assert_eq!(
            canonical_json(&value),
            r#"{"apple":{"nested_a":false,"nested_z":true},"mango":[3,2,1],"zebra":1}"#
        );
    }

    #[test]
    fn canonical_encoding_is_key_order_independent() {
        let forward = json!({"a": 1, "b": {"c": 2, "d": 3}});
        let backward = json!({"b": {"d": 3, "c": 2}, "a": 1});

        assert_eq!(canonical_json(&forward), canonical_json(&backward));

        let signature = sign(&forward, "secret").unwrap();
        assert!(verify(&backward, "secret", &signature));
    }

    #[test]
    fn canonical_encoding_escapes_strings() {
        let value = json!({"quote": "he said \"hi\"", "newline": "a\nb"});

        assert_eq!(
            canonical_json(&value),
            r#"{"newline":"a\nb","quote":"he said \"hi\""}"#
        );
    }
}
