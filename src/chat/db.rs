//! Chat database operations
//!
//! Handles all database interactions for users and chat turns.

use crate::chat::models::{ChatTurn, User};
use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Database connection pool for user and chat operations
pub struct ChatDb {
    pool: SqlitePool,
}

impl ChatDb {
    /// Initialize database connection pool
    ///
    /// # Arguments
    /// * `db_url` - `sqlite:` connection string or plain path to the database file
    ///
    /// # Returns
    /// * `Ok(ChatDb)` if successful
    /// * `Err(AppError)` if connection or migration failed
    pub async fn new(db_url: &str) -> Result<Self, AppError> {
        let connection_string = if db_url.starts_with("sqlite:") {
            db_url.to_string()
        } else {
            format!("sqlite:{}", db_url)
        };

        // Ensure parent directory exists for file-backed databases
        let file_path = connection_string
            .trim_start_matches("sqlite:")
            .trim_start_matches("//")
            .split('?')
            .next()
            .unwrap_or_default();
        let in_memory = file_path.starts_with(":memory:");
        if !in_memory {
            if let Some(parent) = Path::new(file_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::Internal(anyhow::anyhow!("Failed to create db directory: {}", e))
                    })?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database url: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` opens a separate database
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to connect to database: {}", e))
            })?;

        info!("Connected to SQLite database at: {}", db_url);

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../../migrations/001_create_users_and_chats.sql");

        // Strip comments and normalize whitespace
        let mut cleaned_sql = String::new();
        for line in migration_sql.lines() {
            let without_comments = match line.find("--") {
                Some(comment_pos) => &line[..comment_pos],
                None => line,
            };
            let trimmed = without_comments.trim();
            if trimmed.is_empty() {
                continue;
            }
            cleaned_sql.push_str(trimmed);
            cleaned_sql.push(' ');
        }

        for statement in cleaned_sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!(
                        "Migration failed: {} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get a user by id
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, name, email, created_at FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a user
    ///
    /// A row that already exists for the same `user_id` is left untouched.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (user_id, name, email, created_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(&user.user_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        debug!("Created user: {}", user.user_id);
        Ok(())
    }

    /// Get the `limit` most recent turns for a user, oldest first
    pub async fn recent_turns(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<ChatTurn>, AppError> {
        let mut turns = sqlx::query_as::<_, ChatTurn>(
            "SELECT id, user_id, message, reply, created_at FROM chats \
             WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        turns.reverse();
        Ok(turns)
    }

    /// Get every stored turn for a user, in storage order
    pub async fn all_turns(&self, user_id: &str) -> Result<Vec<ChatTurn>, AppError> {
        let turns = sqlx::query_as::<_, ChatTurn>(
            "SELECT id, user_id, message, reply, created_at FROM chats WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(turns)
    }

    /// Persist a chat turn, returning the assigned row id
    pub async fn add_turn(&self, turn: &ChatTurn) -> Result<i64, AppError> {
        let result = sqlx::query(
            "INSERT INTO chats (user_id, message, reply, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&turn.user_id)
        .bind(&turn.message)
        .bind(&turn.reply)
        .bind(turn.created_at)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(user_id = %turn.user_id, turn_id = id, "Stored chat turn");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_db() -> (ChatDb, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("test.db");
        let db = ChatDb::new(db_path.to_str().unwrap())
            .await
            .expect("Failed to create test database");
        (db, temp_dir)
    }

    fn turn_at(user_id: &str, n: i64) -> ChatTurn {
        ChatTurn {
            id: 0,
            user_id: user_id.to_string(),
            message: format!("message {}", n),
            reply: format!("reply {}", n),
            created_at: 1_000 + n,
        }
    }

    #[tokio::test]
    async fn test_get_user_missing() {
        let (db, _temp_dir) = create_test_db().await;
        assert!(db.get_user("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_user_is_idempotent() {
        let (db, _temp_dir) = create_test_db().await;
        let user = User::new(
            "ann_x_com".to_string(),
            "Ann".to_string(),
            "ann@x.com".to_string(),
        );
        db.create_user(&user).await.unwrap();
        db.create_user(&user).await.unwrap();

        let stored = db.get_user("ann_x_com").await.unwrap().unwrap();
        assert_eq!(stored.name, "Ann");
        assert_eq!(stored.email, "ann@x.com");
    }

    #[tokio::test]
    async fn test_turn_requires_existing_user() {
        let (db, _temp_dir) = create_test_db().await;
        let result = db.add_turn(&turn_at("ghost", 1)).await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_recent_turns_are_limited_and_ascending() {
        let (db, _temp_dir) = create_test_db().await;
        let user = User::new("bob".to_string(), "Bob".to_string(), "bob".to_string());
        db.create_user(&user).await.unwrap();

        // Insert out of chronological order
        for n in (0..15).rev() {
            db.add_turn(&turn_at("bob", n)).await.unwrap();
        }

        let turns = db.recent_turns("bob", 10).await.unwrap();
        assert_eq!(turns.len(), 10);
        assert_eq!(turns.first().unwrap().message, "message 5");
        assert_eq!(turns.last().unwrap().message, "message 14");
        assert!(turns.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[tokio::test]
    async fn test_all_turns_scoped_to_user() {
        let (db, _temp_dir) = create_test_db().await;
        for id in ["a", "b"] {
            let user = User::new(id.to_string(), id.to_string(), id.to_string());
            db.create_user(&user).await.unwrap();
        }
        for n in 0..12 {
            db.add_turn(&turn_at("a", n)).await.unwrap();
        }
        db.add_turn(&turn_at("b", 0)).await.unwrap();

        assert_eq!(db.all_turns("a").await.unwrap().len(), 12);
        assert_eq!(db.all_turns("b").await.unwrap().len(), 1);
        assert!(db.all_turns("c").await.unwrap().is_empty());
    }
}
