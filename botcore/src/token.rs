use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::TokenError;

// Legacy MFA tokens, or the three dot-separated segments of a bot token.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(mfa\.[a-z0-9_-]{20,})|([a-z0-9_-]{23,28}\.[a-z0-9_-]{6,7}\.[a-z0-9_-]{27})")
        .expect("token pattern is valid")
});

/// Checks that `raw` looks like a bot token and returns it trimmed.
///
/// Only the shape is checked; whether the token is accepted is up to the
/// gateway.
pub fn validate_token(raw: &str) -> Result<&str, TokenError> {
    let token = raw.trim();
    if TOKEN_RE.is_match(token) {
        Ok(token)
    } else {
        Err(TokenError::InvalidFormat)
    }
}
