//! # User Repository
//!
//! Staff accounts and password login.
//!
//! Passwords are hashed with argon2 before they reach the store; the
//! plain text never leaves this module.

use comanda_core::auth::{hash_password, verify_password};
use comanda_core::validation::validate_name;
use comanda_core::{AuthenticatedUser, CoreError, Role, User};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};

/// Repository for staff accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates a staff account.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Username already taken
    pub async fn create(&self, username: &str, role: Role, password: &str) -> DbResult<User> {
        let username = username.trim();
        validate_name("username", username)?;

        let password_hash = hash_password(password)?;

        debug!(username = %username, role = %role, "Creating user");

        let result = sqlx::query(
            "INSERT INTO users (username, role, password_hash) VALUES (?1, ?2, ?3)",
        )
        .bind(username)
        .bind(role)
        .bind(&password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, username),
            other => other,
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            role,
            password_hash,
        })
    }

    /// Finds a user by exact username.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, role, password_hash FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, role, password_hash FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists all users ordered by id.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, role, password_hash FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Verifies a username/password pair.
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn authenticate(&self, username: &str, password: &str) -> DbResult<AuthenticatedUser> {
        let Some(user) = self.find_by_username(username.trim()).await? else {
            warn!(username = %username, "Login failed: unknown user");
            return Err(CoreError::InvalidCredentials.into());
        };

        if !verify_password(password, &user.password_hash) {
            warn!(username = %username, "Login failed: wrong password");
            return Err(CoreError::InvalidCredentials.into());
        }

        debug!(id = user.id, username = %user.username, "Login succeeded");
        Ok(AuthenticatedUser::from(user))
    }

    /// Number of accounts.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> UserRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().users()
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let users = repo().await;
        let created = users.create("waiter1", Role::Waiter, "waiter123").await.unwrap();

        let found = users.find_by_username("waiter1").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.role, Role::Waiter);
        assert_ne!(found.password_hash, "waiter123");

        assert!(users.find_by_username("Waiter1").await.unwrap().is_none());
        assert!(users.get_by_id(created.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let users = repo().await;
        users.create("admin", Role::Admin, "admin123").await.unwrap();

        let err = users.create("admin", Role::Waiter, "other").await.unwrap_err();
        match err {
            DbError::UniqueViolation { value, .. } => assert_eq!(value, "admin"),
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
        assert_eq!(users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let users = repo().await;
        users.create("admin", Role::Admin, "admin123").await.unwrap();

        let who = users.authenticate("admin", "admin123").await.unwrap();
        assert_eq!(who.username, "admin");
        assert!(who.is_admin());

        assert!(matches!(
            users.authenticate("admin", "nope").await,
            Err(DbError::Core(CoreError::InvalidCredentials))
        ));
        assert!(matches!(
            users.authenticate("ghost", "admin123").await,
            Err(DbError::Core(CoreError::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn test_blank_username_rejected() {
        let users = repo().await;
        assert!(matches!(
            users.create("  ", Role::Waiter, "x").await,
            Err(DbError::Validation(_))
        ));
    }
}
