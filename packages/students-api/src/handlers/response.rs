//! Response types and helpers for HTTP endpoints.

use serde::Serialize;

/// `status` label for general errors.
pub const STATUS_ERROR: &str = "Error";
/// `status` label for field validation errors.
pub const STATUS_VALIDATION_ERROR: &str = "Validation Error";

/// Error body: `{"status": ..., "error": ...}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse<'a> {
    pub status: &'a str,
    pub error: &'a str,
}

/// Response from creating a student.
#[derive(Debug, Serialize)]
pub struct CreateStudentResponse {
    #[serde(rename = "created student id")]
    pub id: i64,
}

/// Response from deleting a student.
#[derive(Debug, Serialize)]
pub struct DeleteStudentResponse {
    #[serde(rename = "deleted student id")]
    pub id: String,
}

/// Helper to create error response
pub fn error_response<'a>(status: &'a str, error: &'a str) -> ErrorResponse<'a> {
    ErrorResponse { status, error }
}
