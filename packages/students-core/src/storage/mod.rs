//! Storage contract and engines for student rows.

mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::error::DbError;
use crate::model::{Student, StudentPatch};

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Idempotent schema for the `students` table.
pub const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS students (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT    NOT NULL,
    email TEXT    NOT NULL,
    age   INTEGER NOT NULL
) STRICT";

/// Persistence operations over the `students` table.
///
/// Implementations are shared by every request handler, so each operation
/// must be safe to call concurrently.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Inserts a new row and returns its assigned id.
    async fn create_student(&self, name: &str, email: &str, age: i64) -> Result<i64, DbError>;

    /// Fetches one row, or `DbError::StudentNotFound`.
    async fn get_student_by_id(&self, id: i64) -> Result<Student, DbError>;

    /// Fetches every row ordered by id. An empty table yields an empty vec.
    async fn get_students(&self) -> Result<Vec<Student>, DbError>;

    /// Removes one row, or `DbError::StudentNotFound` if nothing was deleted.
    async fn delete_student_by_id(&self, id: i64) -> Result<(), DbError>;

    /// Applies the present fields of `patch` and returns the re-read row.
    ///
    /// # Errors
    /// - `DbError::NoFieldsToUpdate` before any write when `patch` is empty
    /// - `DbError::StudentNotFound` when no row matched `id`
    async fn update_student_by_id(
        &self,
        id: i64,
        patch: &StudentPatch,
    ) -> Result<Student, DbError>;
}
