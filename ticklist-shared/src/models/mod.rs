/// Database models for Ticklist
///
/// This module contains the database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and credentials
/// - `todo`: Todo items, always scoped to their owner
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
/// let new_user = CreateUser {
///     username: "alice".to_string(),
///     hashed_password: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod todo;
pub mod user;
