//! Bearer token encoding.
//!
//! A token is the standard base64 form of `"{user_id}:{issued_at_ms}"`. It
//! carries no signature and no expiry: anyone who knows the format can mint
//! one for any user id, and a token stays usable for as long as the user
//! record it names exists. The timestamp only makes successive tokens for the
//! same user differ.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const BEARER_PREFIX: &str = "Bearer ";

/// Fields recovered from a decoded token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: String,
    /// Carried as entropy, never checked
    pub issued_at_ms: Option<i64>,
}

/// Issue a token for `user_id` stamped with the current time.
#[must_use]
pub fn issue(user_id: &str) -> String {
    issue_at(user_id, chrono::Utc::now().timestamp_millis())
}

#[must_use]
pub fn issue_at(user_id: &str, issued_at_ms: i64) -> String {
    STANDARD.encode(format!("{user_id}:{issued_at_ms}"))
}

/// Decode a token into its claims.
///
/// Returns `None` when the token is not valid base64, not UTF-8, or names no
/// user id.
#[must_use]
pub fn decode(token: &str) -> Option<TokenClaims> {
    let bytes = STANDARD.decode(token.trim()).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;

    let mut fields = decoded.split(':');
    let user_id = fields.next().filter(|id| !id.is_empty())?;
    let issued_at_ms = fields.next().and_then(|ts| ts.parse().ok());

    Some(TokenClaims {
        user_id: user_id.to_string(),
        issued_at_ms,
    })
}

/// Extract the token from an `Authorization` header value.
///
/// Only the `Bearer` scheme is accepted, followed by exactly one space. The
/// token ends at the next space.
#[must_use]
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let credentials = header?.strip_prefix(BEARER_PREFIX)?;
    credentials
        .split(' ')
        .next()
        .filter(|token| !token.is_empty())
}
