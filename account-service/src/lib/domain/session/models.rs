use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Opaque long-lived credential exchanged for new access tokens.
///
/// At most one live token exists per user; issuing a new one replaces the
/// previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: UserId,
    pub expiry_date: DateTime<Utc>,
}

impl RefreshToken {
    /// Mint a fresh token for a user.
    ///
    /// The token string is a random UUID v4 (122 bits of entropy), which
    /// makes guessing infeasible and collisions negligible.
    pub fn issue(user_id: UserId, ttl: Duration) -> Self {
        Self {
            token: Uuid::new_v4().to_string(),
            user_id,
            expiry_date: Utc::now() + ttl,
        }
    }

    /// Whether the token is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date < now
    }
}

/// Command for self-registration. Carries no role on purpose: registered
/// users always start as USER.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Everything handed back after a successful login or registration.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Result of exchanging a refresh token: a new access token alongside the
/// unchanged refresh token string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedAccess {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_sets_expiry_from_ttl() {
        let token = RefreshToken::issue(UserId::new(), Duration::days(7));

        assert!(!token.is_expired_at(Utc::now()));
        assert!(token.is_expired_at(Utc::now() + Duration::days(8)));
    }

    #[test]
    fn test_issued_tokens_are_unique() {
        let user_id = UserId::new();
        let first = RefreshToken::issue(user_id, Duration::days(7));
        let second = RefreshToken::issue(user_id, Duration::days(7));

        assert_ne!(first.token, second.token);
    }
}
