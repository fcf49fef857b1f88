//! Student entity and request payload types.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A persisted student row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    /// Store-assigned identity
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// Decoded creation body.
///
/// Every field is optional so a missing key surfaces as a validation
/// violation instead of a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
}

/// A validated creation payload, ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// Updatable student columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentField {
    Name,
    Email,
    Age,
}

impl StudentField {
    /// All updatable fields in canonical statement order.
    pub const ALL: [StudentField; 3] = [StudentField::Name, StudentField::Email, StudentField::Age];

    /// Column name in the `students` table.
    pub fn column(self) -> &'static str {
        match self {
            StudentField::Name => "name",
            StudentField::Email => "email",
            StudentField::Age => "age",
        }
    }
}

impl fmt::Display for StudentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Partial update payload.
///
/// A slot is `None` when the key was absent and `Some(Value::Null)` when the
/// key was sent with an explicit `null`. Unknown keys are dropped on decode.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StudentPatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub age: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl StudentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one slot, returning the patch for chaining.
    pub fn with(mut self, field: StudentField, value: impl Into<Value>) -> Self {
        let value = Some(value.into());
        match field {
            StudentField::Name => self.name = value,
            StudentField::Email => self.email = value,
            StudentField::Age => self.age = value,
        }
        self
    }

    pub fn get(&self, field: StudentField) -> Option<&Value> {
        match field {
            StudentField::Name => self.name.as_ref(),
            StudentField::Email => self.email.as_ref(),
            StudentField::Age => self.age.as_ref(),
        }
    }

    /// Present fields with their values, always in canonical order.
    pub fn assignments(&self) -> impl Iterator<Item = (StudentField, &Value)> + '_ {
        StudentField::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|value| (field, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().next().is_none()
    }
}

/// A scalar bound to a statement placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Bool(bool),
    Null,
}

impl From<&Value> for SqlValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SqlValue::Integer(i),
                None => SqlValue::Real(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => SqlValue::Text(s.clone()),
            // Composite values are stored as their JSON text
            Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
        }
    }
}
