use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::user::{NewUser, User};

const USER_COLUMNS: &str = "id, username, email, password, salt, created_at, updated_at";

/// Persistence for the `users` table
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a new user. Email uniqueness is enforced by the table's unique
    /// index, so two concurrent signups for one email yield exactly one row.
    pub async fn create(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO users (username, email, password, salt, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {}",
            USER_COLUMNS
        );

        let result = sqlx::query_as::<_, User>(&sql)
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.password)
            .bind(&new_user.salt)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                DatabaseError::Conflict(format!("user with email {} already exists", new_user.email)),
            ),
            Err(other) => Err(other.into()),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user with email {}", email)))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<User, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user with id {}", id)))
    }

    /// Usernames are not unique; the oldest matching account wins.
    pub async fn find_by_username(&self, username: &str) -> Result<User, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM users WHERE username = ? ORDER BY id LIMIT 1",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user with username {}", username)))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user with id {}", id)));
        }
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }
}
