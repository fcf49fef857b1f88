//! Creation-time validation of student payloads.

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::DbError;
use crate::model::{CreateStudentRequest, NewStudent};

/// Accepted ages, inclusive.
pub const AGE_RANGE: RangeInclusive<i64> = 1..=120;

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Required,
    Invalid,
    OutOfRange,
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub kind: ViolationKind,
}

impl FieldViolation {
    pub fn new(field: &'static str, kind: ViolationKind) -> Self {
        Self { field, kind }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::Required => write!(f, "field {} is required", self.field),
            ViolationKind::Invalid => write!(f, "field {} is invalid", self.field),
            ViolationKind::OutOfRange => write!(
                f,
                "field {} must be between {} and {}",
                self.field,
                AGE_RANGE.start(),
                AGE_RANGE.end()
            ),
        }
    }
}

impl CreateStudentRequest {
    /// Validates every field and collects all violations.
    ///
    /// # Returns
    /// The insertable `NewStudent`, or `DbError::Validation` listing each
    /// rejected field in declaration order.
    pub fn validate(self) -> Result<NewStudent, DbError> {
        let mut violations = Vec::new();

        let name = match self.name {
            Some(name) if !name.trim().is_empty() => Some(name),
            _ => {
                violations.push(FieldViolation::new("name", ViolationKind::Required));
                None
            }
        };

        let email = match self.email {
            Some(email) if email.is_empty() => {
                violations.push(FieldViolation::new("email", ViolationKind::Required));
                None
            }
            Some(email) if !is_valid_email(&email) => {
                violations.push(FieldViolation::new("email", ViolationKind::Invalid));
                None
            }
            Some(email) => Some(email),
            None => {
                violations.push(FieldViolation::new("email", ViolationKind::Required));
                None
            }
        };

        let age = match self.age {
            Some(age) if AGE_RANGE.contains(&age) => Some(age),
            Some(_) => {
                violations.push(FieldViolation::new("age", ViolationKind::OutOfRange));
                None
            }
            None => {
                violations.push(FieldViolation::new("age", ViolationKind::Required));
                None
            }
        };

        match (name, email, age) {
            (Some(name), Some(email), Some(age)) => Ok(NewStudent { name, email, age }),
            _ => Err(DbError::Validation(violations)),
        }
    }
}

/// Structural email check: `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
