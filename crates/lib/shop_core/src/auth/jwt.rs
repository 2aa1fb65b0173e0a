//! Token issuing and verification.
//!
//! Tokens are HS256 JWTs carrying only the username and a one-hour expiry.
//! They are the whole session: nothing is stored server-side and expiry is
//! the only way a token stops working.

use std::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};

use super::AuthError;
use crate::models::auth::TokenClaims;

/// Access token lifetime: 1 hour.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// Signs and verifies access tokens with a process-wide secret.
///
/// The clock is always passed in, so callers decide what "now" is.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock in `verify`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `username`, valid until `now + 1h`.
    pub fn issue(&self, username: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = TokenClaims {
            sub: username.to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
    }

    /// Verify a token at time `now`.
    ///
    /// Bad signature, malformed structure and `now >= exp` all fail the same
    /// way; the message is for logs only.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let claims = decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| AuthError::TokenError(format!("jwt decode: {e}")))?
            .claims;

        if claims.sub.is_empty() {
            return Err(AuthError::TokenError("empty subject".into()));
        }
        if now.timestamp() >= claims.exp {
            return Err(AuthError::TokenError("token expired".into()));
        }
        Ok(claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

/// Generate a random 64-character signing secret.
pub fn generate_secret() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn verify_returns_issued_subject_before_expiry() {
        let codec = TokenCodec::new(b"secret");
        let token = codec.issue("alice", t0()).unwrap();

        let claims = codec.verify(&token, t0()).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);

        let late = t0() + Duration::seconds(TOKEN_TTL_SECS - 1);
        assert_eq!(codec.verify(&token, late).unwrap().sub, "alice");
    }

    #[test]
    fn token_is_invalid_at_and_after_expiry() {
        let codec = TokenCodec::new(b"secret");
        let token = codec.issue("alice", t0()).unwrap();

        let at_expiry = t0() + Duration::hours(1);
        assert!(codec.verify(&token, at_expiry).is_err());
        assert!(codec.verify(&token, at_expiry + Duration::days(3)).is_err());
    }

    #[test]
    fn token_from_another_secret_never_verifies() {
        let ours = TokenCodec::new(b"secret");
        let theirs = TokenCodec::new(b"other-secret");
        let token = theirs.issue("alice", t0()).unwrap();

        assert!(ours.verify(&token, t0()).is_err());
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let codec = TokenCodec::new(b"secret");
        for token in ["", "abc", "a.b.c", "Bearer x.y.z"] {
            assert!(codec.verify(token, t0()).is_err(), "accepted {token:?}");
        }
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let codec = TokenCodec::new(b"secret");
        let token = codec.issue("alice", t0()).unwrap();
        let forged = codec.issue("mallory", t0()).unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = forged.split('.').nth(1).unwrap();
        assert!(codec.verify(&parts.join("."), t0()).is_err());
    }

    #[test]
    fn generated_secrets_are_long_and_distinct() {
        let a = generate_secret();
        assert_eq!(a.len(), 64);
        assert_ne!(a, generate_secret());
    }
}
