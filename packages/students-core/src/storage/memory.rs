//! In-memory storage engine for tests and local runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use super::Storage;
use crate::error::DbError;
use crate::model::{Student, StudentField, StudentPatch};

#[derive(Debug, Default)]
struct Inner {
    rows: BTreeMap<i64, Student>,
    last_id: i64,
}

/// Student storage held in process memory.
///
/// Ids are never reused, and update values follow the same column typing as
/// the SQLite table: text columns store any non-null value as its text form
/// (booleans as `1`/`0`), `age` takes integers, booleans, integral reals and
/// integer strings, and `null` is rejected everywhere.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().rows.is_empty()
    }
}

fn type_name(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string()
}

fn coerce_text(field: StudentField, value: &Value) -> Result<String, DbError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(i64::from(*b).to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => Ok(value.to_string()),
        other => Err(DbError::TypeMismatch {
            field: field.column(),
            expected: "text",
            got: type_name(other),
        }),
    }
}

fn coerce_integer(field: StudentField, value: &Value) -> Result<i64, DbError> {
    let coerced = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    coerced.ok_or_else(|| DbError::TypeMismatch {
        field: field.column(),
        expected: "integer",
        got: type_name(value),
    })
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_student(&self, name: &str, email: &str, age: i64) -> Result<i64, DbError> {
        let mut inner = self.inner.write();
        inner.last_id += 1;
        let id = inner.last_id;
        inner.rows.insert(
            id,
            Student {
                id,
                name: name.to_string(),
                email: email.to_string(),
                age,
            },
        );
        Ok(id)
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Student, DbError> {
        self.inner
            .read()
            .rows
            .get(&id)
            .cloned()
            .ok_or(DbError::StudentNotFound { id })
    }

    async fn get_students(&self) -> Result<Vec<Student>, DbError> {
        Ok(self.inner.read().rows.values().cloned().collect())
    }

    async fn delete_student_by_id(&self, id: i64) -> Result<(), DbError> {
        self.inner
            .write()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(DbError::StudentNotFound { id })
    }

    async fn update_student_by_id(
        &self,
        id: i64,
        patch: &StudentPatch,
    ) -> Result<Student, DbError> {
        if patch.is_empty() {
            return Err(DbError::NoFieldsToUpdate);
        }

        {
            let mut inner = self.inner.write();
            let row = inner
                .rows
                .get_mut(&id)
                .ok_or(DbError::StudentNotFound { id })?;

            // Coerce everything first so a rejected value leaves the row untouched
            let mut updated = row.clone();
            for (field, value) in patch.assignments() {
                match field {
                    StudentField::Name => updated.name = coerce_text(field, value)?,
                    StudentField::Email => updated.email = coerce_text(field, value)?,
                    StudentField::Age => updated.age = coerce_integer(field, value)?,
                }
            }
            *row = updated;
        }

        self.get_student_by_id(id).await
    }
}
