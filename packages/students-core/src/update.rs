//! Dynamic partial-update statement builder.
//!
//! Turns a [`StudentPatch`] into a parameterized `UPDATE` that assigns
//! exactly the present fields. Values are only ever bound to `?`
//! placeholders; the statement text is assembled from fixed column names.

use crate::error::DbError;
use crate::model::{SqlValue, StudentField, StudentPatch};

/// A ready-to-execute `UPDATE students ...` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// Statement text with positional placeholders
    pub sql: String,
    /// Bound values in placeholder order; the trailing value is the id
    pub params: Vec<SqlValue>,
    /// Fields assigned by the statement, canonical order
    pub fields: Vec<StudentField>,
}

impl UpdateStatement {
    /// Builds the statement for `id` from the present slots of `patch`.
    ///
    /// # Errors
    /// `DbError::NoFieldsToUpdate` when the patch carries none of the
    /// updatable fields.
    pub fn build(id: i64, patch: &StudentPatch) -> Result<Self, DbError> {
        let mut assignments = Vec::with_capacity(StudentField::ALL.len());
        let mut params = Vec::with_capacity(StudentField::ALL.len() + 1);
        let mut fields = Vec::with_capacity(StudentField::ALL.len());

        for (field, value) in patch.assignments() {
            assignments.push(format!("{} = ?", field.column()));
            params.push(SqlValue::from(value));
            fields.push(field);
        }

        if fields.is_empty() {
            return Err(DbError::NoFieldsToUpdate);
        }

        params.push(SqlValue::Integer(id));

        Ok(Self {
            sql: format!(
                "UPDATE students SET {} WHERE id = ?",
                assignments.join(", ")
            ),
            params,
            fields,
        })
    }
}
