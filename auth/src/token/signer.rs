use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::claims::AccessClaims;
use super::claims::RawToken;
use super::errors::TokenError;
use crate::access::Role;

/// Generate a fresh 512-bit signing secret.
///
/// Used at process start when no secret is configured. Tokens signed with a
/// generated secret do not survive a restart; that is an accepted
/// limitation of running without operator-supplied key material.
pub fn generate_secret() -> [u8; 64] {
    let mut secret = [0u8; 64];
    OsRng.fill_bytes(&mut secret);
    secret
}

/// Serialized JWT payload. Private to the signer so claims cannot be
/// constructed or read without going through verification.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    user_id: Uuid,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Issues and verifies compact signed access tokens (JWT, HS256).
///
/// Verification is pure: validity is a function of the signature and the
/// embedded expiry alone, with no store lookup.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenSigner {
    /// Create a signer holding the process-lifetime secret.
    ///
    /// The secret is injected here rather than read from ambient state so
    /// tests can pin a fixed one.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing secret (at least 32 bytes for HS256)
    /// * `ttl` - Lifetime of every issued token
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl,
        }
    }

    /// Mint a signed access token for an authenticated identity.
    ///
    /// # Arguments
    /// * `username` - Token subject
    /// * `user_id` - Owning user's identifier
    /// * `role` - Role granted to the principal
    ///
    /// # Returns
    /// Compact JWT string with `iat` = now and `exp` = now + ttl
    ///
    /// # Errors
    /// * `Encoding` - Serialization or signing failed
    pub fn issue(&self, username: &str, user_id: Uuid, role: Role) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = WireClaims {
            sub: username.to_string(),
            user_id,
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify a presented token and extract its claims.
    ///
    /// # Arguments
    /// * `token` - Unverified bearer token from the client
    ///
    /// # Returns
    /// Verified claims, only produced when the signature matches and the
    /// token has not expired
    ///
    /// # Errors
    /// * `Expired` - `exp` is in the past (no leeway)
    /// * `InvalidSignature` - Signature does not match the secret
    /// * `Malformed` - Token is not a structurally valid JWT
    pub fn verify(&self, token: &RawToken) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let data = decode::<WireClaims>(token.as_str(), &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            },
        )?;

        let claims = data.claims;
        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(TokenError::Malformed)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(TokenError::Malformed)?;

        Ok(AccessClaims {
            username: claims.sub,
            user_id: claims.user_id,
            role: claims.role,
            issued_at,
            expires_at,
        })
    }
}
