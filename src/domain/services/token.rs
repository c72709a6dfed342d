use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{NaiveDate, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

pub const KIND_OFFER: &str = "offer";
pub const KIND_REQUEST: &str = "request";

pub const TOKEN_VERSION: u8 = 1;

/// Signed token body. Offer tokens carry the full slot coordinates;
/// request tokens only identify the request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TokenPayload {
    pub v: u8,
    pub kind: String,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_index: Option<i32>,
    /// Epoch milliseconds.
    pub exp: i64,
}

impl TokenPayload {
    pub fn request(request_id: &str, exp: i64) -> Self {
        Self {
            v: TOKEN_VERSION,
            kind: KIND_REQUEST.to_string(),
            request_id: request_id.to_string(),
            appointment_type: None,
            zone: None,
            service_date: None,
            slot_index: None,
            exp,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not two dot-joined segments")]
    BadFormat,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("token payload is not valid")]
    BadPayload,
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AppError::Expired("Token expired — request new appointment options".to_string()),
            TokenError::BadSignature => AppError::Unauthorized,
            TokenError::BadFormat | TokenError::BadPayload => AppError::Validation("Malformed token".to_string()),
        }
    }
}

/// `base64url(json(payload)) . base64url(hmac_sha256(first_segment))`,
/// padding stripped. Pure; no clock read on the signing side.
pub fn sign(payload: &TokenPayload, secret: &str) -> String {
    let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).expect("token payload serializes"));
    let sig = URL_SAFE_NO_PAD.encode(mac_over(secret, body.as_bytes()));
    format!("{}.{}", body, sig)
}

pub fn verify(token: &str, secret: &str) -> Result<TokenPayload, TokenError> {
    let mut parts = token.split('.');
    let (body, sig) = match (parts.next(), parts.next(), parts.next()) {
        (Some(body), Some(sig), None) if !body.is_empty() && !sig.is_empty() => (body, sig),
        _ => return Err(TokenError::BadFormat),
    };

    let sig_bytes = URL_SAFE_NO_PAD.decode(sig).map_err(|_| TokenError::BadFormat)?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body.as_bytes());
    // verify_slice is the constant-time comparison
    mac.verify_slice(&sig_bytes).map_err(|_| TokenError::BadSignature)?;

    let json = URL_SAFE_NO_PAD.decode(body).map_err(|_| TokenError::BadPayload)?;
    let payload: TokenPayload = serde_json::from_slice(&json).map_err(|_| TokenError::BadPayload)?;

    if payload.exp < Utc::now().timestamp_millis() {
        return Err(TokenError::Expired);
    }

    Ok(payload)
}

fn mac_over(secret: &str, data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &str = "unit-test-secret";

    fn offer_payload(exp: i64) -> TokenPayload {
        TokenPayload {
            v: TOKEN_VERSION,
            kind: KIND_OFFER.to_string(),
            request_id: "req-1".to_string(),
            appointment_type: Some("standard".to_string()),
            zone: Some("B".to_string()),
            service_date: NaiveDate::from_ymd_opt(2026, 2, 9),
            slot_index: Some(1),
            exp,
        }
    }

    fn future_exp() -> i64 {
        (Utc::now() + Duration::hours(1)).timestamp_millis()
    }

    #[test]
    fn test_round_trip() {
        let payload = offer_payload(future_exp());
        let token = sign(&payload, SECRET);
        assert_eq!(verify(&token, SECRET), Ok(payload));
    }

    #[test]
    fn test_request_token_round_trip() {
        let payload = TokenPayload::request("req-2", future_exp());
        let token = sign(&payload, SECRET);
        let verified = verify(&token, SECRET).unwrap();
        assert_eq!(verified.kind, KIND_REQUEST);
        assert_eq!(verified.slot_index, None);
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let token = sign(&offer_payload(future_exp()), SECRET);
        let (body, sig) = token.split_once('.').unwrap();
        // flip the first signature character; the segment still decodes
        let flipped = if sig.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", body, flipped, &sig[1..]);
        assert_eq!(verify(&tampered, SECRET), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign(&offer_payload(future_exp()), SECRET);
        assert_eq!(verify(&token, "other-secret"), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_expired_even_with_valid_signature() {
        let exp = Utc::now().timestamp_millis() - 1;
        let token = sign(&offer_payload(exp), SECRET);
        assert_eq!(verify(&token, SECRET), Err(TokenError::Expired));
    }

    #[test]
    fn test_bad_format() {
        assert_eq!(verify("no-dot-here", SECRET), Err(TokenError::BadFormat));
        assert_eq!(verify("a.b.c", SECRET), Err(TokenError::BadFormat));
        assert_eq!(verify(".sig", SECRET), Err(TokenError::BadFormat));
        assert_eq!(verify("body.", SECRET), Err(TokenError::BadFormat));
    }

    #[test]
    fn test_garbage_payload_with_valid_mac() {
        let body = URL_SAFE_NO_PAD.encode(b"not json at all");
        let sig = URL_SAFE_NO_PAD.encode(mac_over(SECRET, body.as_bytes()));
        let token = format!("{}.{}", body, sig);
        assert_eq!(verify(&token, SECRET), Err(TokenError::BadPayload));
    }
}
