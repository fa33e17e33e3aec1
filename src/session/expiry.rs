//! Token expiration evaluation

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use super::token::decode_claims;

/// Minutes before true expiration at which a token stops being trusted
const EXPIRY_BUFFER_MINUTES: i64 = 5;

/// Safety margin applied by [`is_token_expired`]
pub fn expiry_buffer() -> Duration {
    Duration::minutes(EXPIRY_BUFFER_MINUTES)
}

/// Absolute expiration instant from the token's `exp` claim.
///
/// `None` when the token is undecodable or `exp` is missing or not numeric.
pub fn expiration_instant(token: &str) -> Option<DateTime<Utc>> {
    let claims = decode_claims(token)?;
    let millis = match claims.get("exp")? {
        Value::Number(exp) => match exp.as_i64() {
            Some(secs) => secs.checked_mul(1000)?,
            None => (exp.as_f64()? * 1000.0) as i64,
        },
        _ => return None,
    };
    DateTime::from_timestamp_millis(millis)
}

/// Check if the token is expired or will expire within the buffer window.
///
/// Tokens without a readable expiration are treated as expired.
pub fn is_token_expired(token: &str, now: DateTime<Utc>) -> bool {
    match expiration_instant(token) {
        None => true,
        Some(expires_at) => match expires_at.checked_sub_signed(expiry_buffer()) {
            Some(trusted_until) => now >= trusted_until,
            None => true,
        },
    }
}

/// True remaining lifetime of the token (no buffer), possibly negative
pub fn time_until_expiry(token: &str, now: DateTime<Utc>) -> Option<Duration> {
    expiration_instant(token).map(|expires_at| expires_at - now)
}
