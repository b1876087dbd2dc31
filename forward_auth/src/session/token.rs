//! Stateless signed session tokens
//!
//! A token is `base64url(payload + "." + hex(hmac))` where `payload` is the JSON
//! `{"value": .., "expiry": ..}` and the MAC is HMAC-SHA256 over the payload bytes.
//! Nothing is stored server side, so any instance holding the secret can verify.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::TokenError;
use super::types::TokenPayload;
use crate::utils::{base64url_decode, base64url_encode};

type HmacSha256 = Hmac<Sha256>;

/// Signs `value`, expiring `max_age_ms` from now (`0` never expires)
pub fn sign_token(value: &str, max_age_ms: u64, secret: &[u8]) -> Result<String, TokenError> {
    sign_token_at(value, max_age_ms, secret, Utc::now())
}

pub fn sign_token_at(
    value: &str,
    max_age_ms: u64,
    secret: &[u8],
    now: DateTime<Utc>,
) -> Result<String, TokenError> {
    let expiry = (max_age_ms > 0).then(|| {
        now.timestamp_millis()
            .saturating_add(i64::try_from(max_age_ms).unwrap_or(i64::MAX))
    });

    let payload = serde_json::to_string(&TokenPayload {
        value: value.to_string(),
        expiry,
    })
    .map_err(|e| TokenError::Payload(e.to_string()))?;

    let signature = compute_signature(payload.as_bytes(), secret)?;
    Ok(base64url_encode(format!("{payload}.{signature}")))
}

/// Returns the signed value when `token` is authentic and unexpired.
///
/// Every failure, including garbage input, yields `None`.
pub fn verify_token(token: &str, secret: &[u8]) -> Option<String> {
    verify_token_at(token, secret, Utc::now())
}

pub fn verify_token_at(token: &str, secret: &[u8], now: DateTime<Utc>) -> Option<String> {
    match decode_token(token, secret, now) {
        Ok(payload) => Some(payload.value),
        Err(e) => {
            tracing::debug!("Rejected session token: {e}");
            None
        }
    }
}

fn decode_token(token: &str, secret: &[u8], now: DateTime<Utc>) -> Result<TokenPayload, TokenError> {
    if token.is_empty() {
        return Err(TokenError::Missing);
    }

    let decoded = String::from_utf8(base64url_decode(token)?)
        .map_err(|_| TokenError::Format("Token is not valid UTF-8".to_string()))?;

    // The hex signature never contains '.', the JSON payload may
    let (payload, signature) = decoded
        .rsplit_once('.')
        .ok_or_else(|| TokenError::Format("Missing signature separator".to_string()))?;

    let expected = compute_signature(payload.as_bytes(), secret)?;
    if !bool::from(signature.as_bytes().ct_eq(expected.as_bytes())) {
        return Err(TokenError::Signature);
    }

    let data: TokenPayload =
        serde_json::from_str(payload).map_err(|e| TokenError::Payload(e.to_string()))?;

    if let Some(expiry) = data.expiry {
        if now.timestamp_millis() > expiry {
            return Err(TokenError::Expired(expiry));
        }
    }

    Ok(data)
}

fn compute_signature(payload: &[u8], secret: &[u8]) -> Result<String, TokenError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|_| TokenError::Crypto("Invalid HMAC key".to_string()))?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
    use chrono::Duration;
    use proptest::prelude::*;

    const SECRET: &[u8] = b"test-secret";

    fn decode(token: &str) -> Vec<u8> {
        URL_SAFE_NO_PAD.decode(token).unwrap()
    }

    fn encode(bytes: &[u8]) -> String {
        URL_SAFE_NO_PAD.encode(bytes)
    }

    #[test]
    fn test_sign_then_verify() {
        let token = sign_token("1", 60_000, SECRET).unwrap();
        assert_eq!(verify_token(&token, SECRET), Some("1".to_string()));
    }

    #[test]
    fn test_token_layout() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let token = sign_token_at("1", 1_000, SECRET, now).unwrap();
        let decoded = String::from_utf8(decode(&token)).unwrap();

        let (payload, signature) = decoded.rsplit_once('.').unwrap();
        assert_eq!(payload, r#"{"value":"1","expiry":1700000001000}"#);
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(!token.contains('='));
    }

    #[test]
    fn test_zero_max_age_never_expires() {
        let long_ago = Utc::now() - Duration::days(3650);
        let token = sign_token_at("1", 0, SECRET, long_ago).unwrap();
        let decoded = String::from_utf8(decode(&token)).unwrap();
        assert!(decoded.starts_with(r#"{"value":"1","expiry":null}."#));
        assert_eq!(verify_token(&token, SECRET), Some("1".to_string()));
    }

    #[test]
    fn test_expiry_boundary() {
        let signed_at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let token = sign_token_at("1", 5_000, SECRET, signed_at).unwrap();
        let expiry = signed_at + Duration::milliseconds(5_000);

        assert_eq!(
            verify_token_at(&token, SECRET, expiry - Duration::milliseconds(1)),
            Some("1".to_string())
        );
        assert_eq!(verify_token_at(&token, SECRET, expiry), Some("1".to_string()));
        assert_eq!(
            verify_token_at(&token, SECRET, expiry + Duration::milliseconds(1)),
            None
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign_token("1", 60_000, SECRET).unwrap();
        assert_eq!(verify_token(&token, b"other-secret"), None);
    }

    #[test]
    fn test_garbage_rejected() {
        for token in ["", "%%%", "bm90LWEtdG9rZW4", "Lg", "e30uYWJj", "/w"] {
            assert_eq!(verify_token(token, SECRET), None, "token {token:?}");
        }
    }

    #[test]
    fn test_forged_payload_with_valid_format_rejected() {
        let forged = encode(format!(r#"{{"value":"1","expiry":null}}.{}"#, "0".repeat(64)).as_bytes());
        assert_eq!(verify_token(&forged, SECRET), None);
    }

    #[test]
    fn test_signature_over_non_json_payload_rejected() {
        let payload = "not json";
        let signature = compute_signature(payload.as_bytes(), SECRET).unwrap();
        let token = encode(format!("{payload}.{signature}").as_bytes());
        assert!(matches!(
            decode_token(&token, SECRET, Utc::now()),
            Err(TokenError::Payload(_))
        ));
    }

    #[test]
    fn test_uppercase_signature_rejected() {
        let token = sign_token("1", 60_000, SECRET).unwrap();
        let decoded = String::from_utf8(decode(&token)).unwrap();
        let (payload, signature) = decoded.rsplit_once('.').unwrap();
        let shouted = encode(format!("{payload}.{}", signature.to_uppercase()).as_bytes());
        assert!(matches!(
            decode_token(&shouted, SECRET, Utc::now()),
            Err(TokenError::Signature)
        ));
    }

    #[test]
    fn test_rejection_reasons() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let token = sign_token_at("1", 1, SECRET, now).unwrap();

        assert!(matches!(decode_token("", SECRET, now), Err(TokenError::Missing)));
        assert!(matches!(
            decode_token(&token, b"x", now),
            Err(TokenError::Signature)
        ));
        assert!(matches!(
            decode_token(&token, SECRET, now + Duration::seconds(1)),
            Err(TokenError::Expired(1_700_000_000_001))
        ));
        assert!(matches!(
            decode_token("***", SECRET, now),
            Err(TokenError::Utils(_))
        ));
    }

    proptest! {
        #[test]
        fn test_roundtrip_any_value_and_secret(
            value in ".{0,64}",
            secret in proptest::collection::vec(any::<u8>(), 1..64),
            max_age_ms in 1u64..10_000_000_000,
        ) {
            let token = sign_token(&value, max_age_ms, &secret).unwrap();
            prop_assert_eq!(verify_token(&token, &secret), Some(value));
        }

        #[test]
        fn test_other_secret_never_verifies(
            value in ".{0,32}",
            s1 in proptest::collection::vec(any::<u8>(), 1..32),
            s2 in proptest::collection::vec(any::<u8>(), 1..32),
        ) {
            prop_assume!(s1 != s2);
            let token = sign_token(&value, 60_000, &s1).unwrap();
            prop_assert_eq!(verify_token(&token, &s2), None);
        }

        #[test]
        fn test_tampering_any_byte_invalidates(
            index in any::<proptest::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let token = sign_token("1", 60_000, SECRET).unwrap();
            let mut bytes = decode(&token);
            let i = index.index(bytes.len());
            bytes[i] ^= flip;
            let tampered = encode(&bytes);
            prop_assert_eq!(verify_token(&tampered, SECRET), None);
        }

        #[test]
        fn test_arbitrary_input_never_panics(token in ".*") {
            let _ = verify_token(&token, SECRET);
        }
    }
}
