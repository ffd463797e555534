//! # Staff Authentication
//!
//! Password hashing for staff accounts and the identity handed to the
//! order lifecycle once a login succeeds.
//!
//! ```text
//! login(username, password)
//!      │
//!      ▼
//! users.password_hash ──► verify_password (argon2, PHC string)
//!      │
//!      ├── mismatch → CoreError::InvalidCredentials
//!      │
//!      └── match    → AuthenticatedUser { id, username, role }
//!                          │
//!                          ▼
//!                     create_order(table_id, user.id)
//! ```
//!
//! Hashes are salted per account, so hashing the same password twice
//! yields two different strings.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Role, User};

/// A staff member whose password has been verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl AuthenticatedUser {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        AuthenticatedUser {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Hashes a password for storage.
pub fn hash_password(password: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::PasswordHash(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Checks a password against a stored hash.
///
/// A malformed stored hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("waiter123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("waiter123", &hash));
        assert!(!verify_password("waiter124", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("admin123").unwrap();
        let b = hash_password("admin123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!verify_password("admin123", "admin123"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn test_from_user_drops_hash() {
        let user = User {
            id: 2,
            username: "waiter1".to_string(),
            role: Role::Waiter,
            password_hash: "x".to_string(),
        };
        let auth = AuthenticatedUser::from(user);
        assert_eq!(auth.id, 2);
        assert!(!auth.is_admin());
    }
}
