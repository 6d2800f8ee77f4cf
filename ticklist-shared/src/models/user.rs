/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username VARCHAR(50) NOT NULL UNIQUE,
///     hashed_password VARCHAR(255) NOT NULL,
///     profile_image VARCHAR(512),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Usernames are unique and immutable after creation. Passwords are
/// stored as Argon2id hashes, never plaintext. Users are never deleted.
///
/// # Example
///
/// ```no_run
/// use ticklist_shared::models::user::{User, CreateUser};
/// use ticklist_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "alice".to_string(),
///         hashed_password: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
///
/// let found = User::find_by_username(&pool, "alice").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User model representing a registered account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user id, assigned on creation
    pub id: i64,

    /// Unique username, immutable after creation
    pub username: String,

    /// Argon2id password hash
    ///
    /// Never serialized outward; public responses use explicit response
    /// structs that omit it.
    #[serde(skip_serializing)]
    pub hashed_password: String,

    /// Optional profile image URL, set by the upload action
    pub profile_image: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Desired username
    pub username: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub hashed_password: String,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username already exists (unique constraint
    /// violation) or the database call fails. The API layer maps the
    /// constraint violation to a duplicate-username conflict.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, hashed_password)
            VALUES ($1, $2)
            RETURNING id, username, hashed_password, profile_image, created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.hashed_password)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by id
    ///
    /// Returns `None` when no such user exists.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, hashed_password, profile_image, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username
    ///
    /// Returns `None` when no such user exists.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, hashed_password, profile_image, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Sets the profile image URL for a user
    ///
    /// Only the URL returned by the image host is stored; the image bytes
    /// never touch the database.
    ///
    /// # Returns
    ///
    /// The updated user, or `None` if the user doesn't exist.
    pub async fn set_profile_image(
        pool: &PgPool,
        id: i64,
        url: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET profile_image = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, hashed_password, profile_image, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(url)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            username: "alice".to_string(),
            hashed_password: "hash".to_string(),
        };

        assert_eq!(create_user.username, "alice");
        assert_eq!(create_user.hashed_password, "hash");
    }

    #[test]
    fn test_user_serialization_omits_password_hash() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            hashed_password: "$argon2id$secret".to_string(),
            profile_image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("hashed_password"));
        assert!(json.contains("alice"));
    }
}
