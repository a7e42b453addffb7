use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::user::models::UserId;

/// Refresh-token store backed by Postgres.
///
/// The `user_id` column carries a unique constraint, so replacement is a
/// single `ON CONFLICT` upsert: concurrent logins for one user serialize in
/// the database and can never leave two live rows, nor a window with none.
pub struct PostgresRefreshTokenRepository {
    pool: PgPool,
}

impl PostgresRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    token: String,
    user_id: Uuid,
    expiry_date: DateTime<Utc>,
}

impl From<RefreshTokenRow> for RefreshToken {
    fn from(row: RefreshTokenRow) -> Self {
        RefreshToken {
            token: row.token,
            user_id: UserId(row.user_id),
            expiry_date: row.expiry_date,
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
    async fn upsert(&self, token: RefreshToken) -> Result<RefreshToken, SessionError> {
        sqlx::query(
            "INSERT INTO refresh_tokens (token, user_id, expiry_date) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) \
             DO UPDATE SET token = EXCLUDED.token, expiry_date = EXCLUDED.expiry_date",
        )
        .bind(&token.token)
        .bind(token.user_id.0)
        .bind(token.expiry_date)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::Database(e.to_string()))?;

        Ok(token)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, SessionError> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            "SELECT token, user_id, expiry_date FROM refresh_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SessionError::Database(e.to_string()))?;

        Ok(row.map(RefreshToken::from))
    }

    async fn delete_by_user(&self, user_id: &UserId) -> Result<(), SessionError> {
        // Idempotent: deleting an absent row is not an error.
        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| SessionError::Database(e.to_string()))?;

        Ok(())
    }
}
