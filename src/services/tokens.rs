use chrono::{DateTime, Duration, Utc};

/// What a token is issued for. The two kinds carry different expiry windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Verification,
    PasswordReset,
}

/// Generate an opaque bearer token: 32 random bytes, hex-encoded.
pub fn generate_token() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.random()).collect();
    hex::encode(bytes)
}

/// Expiry timestamp for a freshly issued token of the given kind.
pub fn expires_at(kind: TokenKind) -> DateTime<Utc> {
    Utc::now()
        + match kind {
            TokenKind::Verification => Duration::hours(24),
            TokenKind::PasswordReset => Duration::hours(1),
        }
}

/// Short prefix safe to include in debug logs. Never log the full token.
pub fn log_prefix(token: &str) -> &str {
    &token[..token.len().min(8)]
}
