//! Student CRUD operation handlers.

use std::fmt::Display;

use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use students_core::model::{CreateStudentRequest, StudentPatch};

use super::request_utils::{
    json_response, map_db_error_to_router_error, parse_json_body, parse_student_id,
    read_request_body_with_timeout, MatchitParams,
};
use super::response::{CreateStudentResponse, DeleteStudentResponse};
use crate::router::{AppState, RouterError};

/// Creates a new student.
///
/// # Endpoint
/// `POST /api/students`
///
/// # Request Body
/// ```json
/// {
///   "name": "Ann",
///   "email": "ann@x.com",
///   "age": 20
/// }
/// ```
///
/// # Response
/// - **200 OK**: Returns the assigned student id
/// ```json
/// {
///   "created student id": 1
/// }
/// ```
///
/// # Errors
/// - **400 Bad Request**: Empty body, malformed JSON, or a field failed validation
/// - **500 Internal Server Error**: Storage failure
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:8082/api/students \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Ann", "email": "ann@x.com", "age": 20}'
/// ```
pub async fn create_student<B>(
    req: Request<B>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    tracing::info!("Creating a student");

    let body_bytes = read_request_body_with_timeout(req, state.config.request_timeout_ms).await?;
    let request: CreateStudentRequest = parse_json_body(&body_bytes)?;
    let student = request.validate().map_err(map_db_error_to_router_error)?;

    let id = state
        .storage
        .create_student(&student.name, &student.email, student.age)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create student");
            map_db_error_to_router_error(e)
        })?;

    tracing::info!(id, "Student created successfully");
    json_response(StatusCode::OK, &CreateStudentResponse { id })
}

/// Reads one student.
///
/// # Endpoint
/// `GET /api/students/{id}`
///
/// # Response
/// - **200 OK**: Student JSON
/// ```json
/// {
///   "id": 1,
///   "name": "Ann",
///   "email": "ann@x.com",
///   "age": 20
/// }
/// ```
///
/// # Errors
/// - **400 Bad Request**: Non-numeric id
/// - **404 Not Found**: No student with that id
/// - **500 Internal Server Error**: Storage failure
pub async fn get_student<B>(
    _req: Request<B>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = parse_student_id(&params)?;
    tracing::info!(id, "Getting a student");

    let student = state
        .storage
        .get_student_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!(id, error = %e, "Failed to get student");
            map_db_error_to_router_error(e)
        })?;

    tracing::info!(id, "Student fetched successfully");
    json_response(StatusCode::OK, &student)
}

/// Lists every student.
///
/// # Endpoint
/// `GET /api/students`
///
/// # Response
/// - **200 OK**: Array of student JSON, `[]` when there are none
pub async fn list_students<B>(
    _req: Request<B>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    tracing::info!("Getting all students");

    let students = state
        .storage
        .get_students()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to get students");
            map_db_error_to_router_error(e)
        })?;

    tracing::info!(count = students.len(), "All students fetched successfully");
    json_response(StatusCode::OK, &students)
}

/// Partially updates a student.
///
/// # Endpoint
/// `PUT /api/students/{id}`
///
/// # Request Body
/// Any subset of the updatable fields. Unknown keys are ignored.
/// ```json
/// {
///   "email": "a@y.com"
/// }
/// ```
///
/// # Response
/// - **200 OK**: The updated student, re-read from storage
///
/// # Errors
/// - **400 Bad Request**: Non-numeric id, empty body, malformed JSON, or no
///   recognized field supplied
/// - **404 Not Found**: No student with that id
/// - **500 Internal Server Error**: Storage failure, including values the
///   store refuses for a column's type
///
/// # Notes
/// - Update values are not validated beyond presence; the store enforces
///   column types
///
/// # Example
/// ```bash
/// curl -X PUT http://localhost:8082/api/students/1 \
///   -H "Content-Type: application/json" \
///   -d '{"email": "a@y.com"}'
/// ```
pub async fn update_student<B>(
    req: Request<B>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let id = parse_student_id(&params)?;
    tracing::info!(id, "Updating a student");

    let body_bytes = read_request_body_with_timeout(req, state.config.request_timeout_ms).await?;
    let patch: StudentPatch = parse_json_body(&body_bytes)?;

    let student = state
        .storage
        .update_student_by_id(id, &patch)
        .await
        .map_err(|e| {
            tracing::error!(id, error = %e, "Failed to update student");
            map_db_error_to_router_error(e)
        })?;

    tracing::info!(id, "Student updated successfully");
    json_response(StatusCode::OK, &student)
}

/// Deletes a student.
///
/// # Endpoint
/// `DELETE /api/students/{id}`
///
/// # Response
/// - **200 OK**: `{"deleted student id": "1"}`, echoing the id exactly as
///   written in the path
///
/// # Errors
/// - **400 Bad Request**: Non-numeric id
/// - **404 Not Found**: No student with that id, including one already deleted
/// - **500 Internal Server Error**: Storage failure
pub async fn delete_student<B>(
    _req: Request<B>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = parse_student_id(&params)?;
    tracing::info!(id, "Deleting a student");

    state
        .storage
        .delete_student_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!(id, error = %e, "Failed to delete student");
            map_db_error_to_router_error(e)
        })?;

    tracing::info!(id, "Student deleted successfully");
    let raw_id = params.get("id").unwrap_or_default().to_string();
    json_response(StatusCode::OK, &DeleteStudentResponse { id: raw_id })
}
