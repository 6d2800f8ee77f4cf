/// Todo model and owner-scoped database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todos (
///     id BIGSERIAL PRIMARY KEY,
///     text TEXT NOT NULL,
///     done BOOLEAN NOT NULL DEFAULT FALSE,
///     owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Ownership scoping
///
/// Every read, update, and delete filters by `(id, owner_id)` jointly.
/// A valid todo id belonging to another user therefore behaves exactly
/// like a nonexistent id: the operation returns `None`, never a
/// forbidden-style result. Cross-user access is structurally impossible
/// as long as callers pass the owner id resolved from a verified token.
///
/// # Example
///
/// ```no_run
/// use ticklist_shared::models::todo::Todo;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, owner_id: i64) -> Result<(), sqlx::Error> {
/// let todo = Todo::create(&pool, owner_id, "buy milk").await?;
/// assert!(!todo.done);
///
/// let todos = Todo::list_for_owner(&pool, owner_id).await?;
/// assert_eq!(todos[0].id, todo.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Todo model representing a single list item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    /// Unique todo id
    pub id: i64,

    /// Free-form item content
    pub text: String,

    /// Completion flag, false on creation
    pub done: bool,

    /// Owning user's id, immutable
    pub owner_id: i64,

    /// When the item was created
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new todo for the given owner
    ///
    /// The item starts with `done = false`.
    pub async fn create(pool: &PgPool, owner_id: i64, text: &str) -> Result<Self, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (text, owner_id)
            VALUES ($1, $2)
            RETURNING id, text, done, owner_id, created_at
            "#,
        )
        .bind(text)
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(todo)
    }

    /// Lists all todos belonging to an owner, newest first by id
    pub async fn list_for_owner(pool: &PgPool, owner_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, text, done, owner_id, created_at
            FROM todos
            WHERE owner_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(todos)
    }

    /// Lists an owner's todos filtered by done state, newest first by id
    pub async fn list_for_owner_by_done(
        pool: &PgPool,
        owner_id: i64,
        done: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, text, done, owner_id, created_at
            FROM todos
            WHERE owner_id = $1 AND done = $2
            ORDER BY id DESC
            "#,
        )
        .bind(owner_id)
        .bind(done)
        .fetch_all(pool)
        .await?;

        Ok(todos)
    }

    /// Finds a todo by id, scoped to its owner
    ///
    /// Returns `None` when the id doesn't exist or belongs to another
    /// user.
    pub async fn find_for_owner(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, text, done, owner_id, created_at
            FROM todos
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Flips the done flag of a todo, scoped to its owner
    ///
    /// A single atomic UPDATE, so the toggle always observes a consistent
    /// snapshot: applying it twice returns `done` to its original value
    /// even under concurrent requests.
    ///
    /// # Returns
    ///
    /// The updated todo, or `None` when no matching row exists for that
    /// owner.
    pub async fn toggle_done(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET done = NOT done
            WHERE id = $1 AND owner_id = $2
            RETURNING id, text, done, owner_id, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Replaces a todo's text and done flag, scoped to its owner
    ///
    /// A single atomic UPDATE, same as [`Todo::toggle_done`].
    ///
    /// # Returns
    ///
    /// The updated todo, or `None` when no matching row exists for that
    /// owner.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
        text: &str,
        done: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET text = $3, done = $4
            WHERE id = $1 AND owner_id = $2
            RETURNING id, text, done, owner_id, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(text)
        .bind(done)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Deletes a todo, scoped to its owner
    ///
    /// Deletion is permanent; there is no soft-delete.
    ///
    /// # Returns
    ///
    /// The removed todo, or `None` when no matching row exists for that
    /// owner.
    pub async fn delete(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            DELETE FROM todos
            WHERE id = $1 AND owner_id = $2
            RETURNING id, text, done, owner_id, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }
}
