use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

/// Identity claims embedded in a signed token. The token itself is the
/// complete proof of identity until expiry; no server-side session exists.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub name: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn new(id: i64, email: String, name: String, expires_in_seconds: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::seconds(expires_in_seconds);
        Self {
            id,
            email,
            name,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Sign the claims into a compact token with the process-wide secret.
pub fn issue_token(claims: &Claims, secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenIssuance(e.to_string()))
}

/// Verify signature and expiry, returning the embedded claims unchanged.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    // The decoder allows a short leeway; expiry is exact here.
    if data.claims.is_expired() {
        return Err(AuthError::ExpiredToken);
    }

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn claims(expires_in_seconds: i64) -> Claims {
        Claims::new(
            7,
            "ada@example.com".to_string(),
            "Ada".to_string(),
            expires_in_seconds,
        )
    }

    #[test]
    fn verify_returns_issued_claims() {
        let issued = claims(3600);
        let token = issue_token(&issued, SECRET).unwrap();

        let verified = verify_token(&token, SECRET).unwrap();
        assert_eq!(verified, issued);
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = issue_token(&claims(3600), SECRET).unwrap();

        let err = verify_token(&token, "other-secret").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn tampered_token_is_invalid() {
        let token = issue_token(&claims(3600), SECRET).unwrap();
        let tampered = format!("{token}x");

        let err = verify_token(&tampered, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = verify_token("not.a.token", SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn past_expiry_is_expired() {
        // Issued already expired; still within the decoder's leeway, so the
        // exact check has to catch it.
        let token = issue_token(&claims(-1), SECRET).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(100));

        let err = verify_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::ExpiredToken));
    }

    #[test]
    fn long_past_expiry_is_expired() {
        // Outside leeway as well, rejected by the decoder itself.
        let token = issue_token(&claims(-3600), SECRET).unwrap();

        let err = verify_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::ExpiredToken));
    }
}
