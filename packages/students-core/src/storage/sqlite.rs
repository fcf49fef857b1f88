//! SQLite storage engine backed by an `sqlx` connection pool.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;

use super::{Storage, CREATE_TABLE_SQL};
use crate::error::DbError;
use crate::model::{SqlValue, Student, StudentPatch};
use crate::update::UpdateStatement;

/// Pool size for file-backed databases.
const MAX_CONNECTIONS: u32 = 5;

/// Student storage over a SQLite database.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Opens (creating if missing) the database file at `path` and ensures
    /// the `students` table exists.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        tracing::debug!(path = %path.as_ref().display(), "Opened SQLite database");
        Self::init(pool).await
    }

    /// Opens a private in-memory database.
    ///
    /// Every pooled connection would see its own empty database, so the pool
    /// is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::init(pool).await
    }

    async fn init(pool: SqlitePool) -> Result<Self, DbError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &SqlValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Text(s) => query.bind(s.clone()),
        SqlValue::Integer(i) => query.bind(*i),
        SqlValue::Real(f) => query.bind(*f),
        SqlValue::Bool(b) => query.bind(*b),
        SqlValue::Null => query.bind(Option::<String>::None),
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn create_student(&self, name: &str, email: &str, age: i64) -> Result<i64, DbError> {
        let result = sqlx::query("INSERT INTO students (name, email, age) VALUES (?, ?, ?)")
            .bind(name)
            .bind(email)
            .bind(age)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Student, DbError> {
        sqlx::query_as::<_, Student>(
            "SELECT id, name, email, age FROM students WHERE id = ? LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::StudentNotFound { id })
    }

    async fn get_students(&self) -> Result<Vec<Student>, DbError> {
        let students =
            sqlx::query_as::<_, Student>("SELECT id, name, email, age FROM students ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(students)
    }

    async fn delete_student_by_id(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::StudentNotFound { id });
        }
        Ok(())
    }

    async fn update_student_by_id(
        &self,
        id: i64,
        patch: &StudentPatch,
    ) -> Result<Student, DbError> {
        let statement = UpdateStatement::build(id, patch)?;

        let query = statement
            .params
            .iter()
            .fold(sqlx::query(&statement.sql), bind_value);
        let result = query.execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DbError::StudentNotFound { id });
        }

        tracing::debug!(id, fields = ?statement.fields, "Updated student row");

        // Not atomic with the write: a concurrent delete surfaces as not found
        self.get_student_by_id(id).await
    }
}
