use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::access::Role;

/// Bearer token exactly as presented by the client, before verification.
///
/// Keeping the unverified string behind a newtype means claim data can only
/// come out of [`TokenSigner::verify`](crate::token::TokenSigner::verify);
/// nothing downstream can accidentally trust an unchecked token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken(String);

impl RawToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identity facts extracted from a successfully verified access token.
///
/// Instances exist only on the far side of signature and expiry checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    /// Username (token subject)
    pub username: String,
    /// Owning user's unique identifier
    pub user_id: Uuid,
    /// Role granted at issuance time
    pub role: Role,
    /// Issuance instant
    pub issued_at: DateTime<Utc>,
    /// Expiry instant
    pub expires_at: DateTime<Utc>,
}
