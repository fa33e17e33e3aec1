//! Bearer token claim decoding
//!
//! Reads the claims segment of a `header.claims.signature` token without
//! verifying the signature. The backend verifies signatures; the client only
//! needs to know when to stop trusting a token it already holds.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use log::debug;

/// Decoded token claims
pub type Claims = serde_json::Map<String, serde_json::Value>;

/// Standard alphabet, padding optional
const CLAIMS_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode base64url (URL-safe base64, padded or unpadded)
fn base64_decode_url(input: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    // Base64url uses - instead of + and _ instead of /
    let standard_b64 = input.replace('-', "+").replace('_', "/");
    CLAIMS_ENGINE.decode(standard_b64)
}

/// Decode the claims segment of a token.
///
/// Returns `None` when the token does not have exactly three segments, or
/// when the middle segment is not base64 encoded JSON object. Never fails
/// loudly: an undecodable token is simply a token without claims.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        debug!("Token has {} segments, expected 3", parts.len());
        return None;
    }

    let payload = match base64_decode_url(parts[1]) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Failed to decode token claims: {}", e);
            return None;
        }
    };

    match serde_json::from_slice::<Claims>(&payload) {
        Ok(claims) => Some(claims),
        Err(e) => {
            debug!("Failed to parse token claims: {}", e);
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_tokens::{expiring_at, with_claims};
    use super::*;

    #[test]
    fn test_decode_valid_token() {
        let claims = decode_claims(&expiring_at(1_700_000_000)).unwrap();
        assert_eq!(claims["exp"], 1_700_000_000);
        assert_eq!(claims["sub"], "1");
    }

    #[test]
    fn test_decode_padded_segment() {
        use base64::engine::general_purpose::URL_SAFE;

        // Ten bytes of JSON encode with trailing padding
        let body = URL_SAFE.encode(r#"{"exp":12}"#);
        assert!(body.ends_with('='));

        let claims = decode_claims(&format!("h.{}.s", body)).unwrap();
        assert_eq!(claims["exp"], 12);
    }

    #[test]
    fn test_decode_url_safe_characters() {
        // A run of '~' (0x7E) always encodes to a group containing '-'
        let token = with_claims(r#"{"exp":1,"note":"~~~~~~~~"}"#);
        let body = token.split('.').nth(1).unwrap();
        assert!(body.contains('-') || body.contains('_'));

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims["note"], "~~~~~~~~");
    }

    #[test]
    fn test_wrong_segment_count() {
        assert!(decode_claims("not-a-jwt").is_none());
        assert!(decode_claims("a.b").is_none());
        assert!(decode_claims("a.b.c.d").is_none());
        assert!(decode_claims("").is_none());
    }

    #[test]
    fn test_invalid_base64() {
        assert!(decode_claims("header.!!!.signature").is_none());
        // Length 1 mod 4 is never valid base64
        assert!(decode_claims("header.abcde.signature").is_none());
    }

    #[test]
    fn test_invalid_json() {
        let token = with_claims("not json");
        assert!(decode_claims(&token).is_none());
    }

    #[test]
    fn test_non_object_json() {
        let token = with_claims("[1,2,3]");
        assert!(decode_claims(&token).is_none());
    }
}
