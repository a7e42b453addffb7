use async_trait::async_trait;
use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Credential store backed by Postgres.
///
/// Uniqueness of `username` and of non-empty `email` values is enforced by
/// the unique indexes created in the migrations, so racing writers resolve
/// in the database rather than in application checks.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e: auth::access::ParseRoleError| UserError::Database(e.to_string()))?;

        Ok(User {
            id: UserId(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
        })
    }
}

const SELECT_USER: &str =
    "SELECT id, username, email, password_hash, role, created_at FROM users";

fn map_write_error(e: sqlx::Error) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_username_key") => UserError::username_taken(),
                Some("users_email_key") => UserError::email_taken(),
                _ => UserError::Database(e.to_string()),
            };
        }
    }
    UserError::Database(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, role, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id.0)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, UserError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| UserError::Database(e.to_string()))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, UserError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 AND email <> '')",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| UserError::Database(e.to_string()))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} ORDER BY created_at"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let result = sqlx::query(
            "UPDATE users SET username = $2, email = $3, password_hash = $4, role = $5 \
             WHERE id = $1",
        )
        .bind(user.id.0)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(user.id.to_string()));
        }

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
