//! Request utilities for HTTP endpoints.

use std::fmt::Display;

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use students_core::error::DbError;
use tokio::time;

use crate::router::RouterError;

/// Type alias for matchit parameters with explicit lifetimes
pub type MatchitParams<'a, 'b> = matchit::Params<'a, 'b>;

/// Helper function to read request body with timeout
pub async fn read_request_body_with_timeout<B>(
    req: Request<B>,
    timeout_ms: u64,
) -> Result<Bytes, RouterError>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let body = time::timeout(timeout_duration, req.into_body().collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::InternalError(format!("Failed to read request body: {}", e)))?;
    Ok(body.to_bytes())
}

/// Decodes a JSON body, rejecting empty or whitespace-only payloads.
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, RouterError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RouterError::BadRequest("empty body".to_string()));
    }
    serde_json::from_slice(body).map_err(|e| RouterError::BadRequest(e.to_string()))
}

/// Parses the `{id}` path segment as a student id.
pub fn parse_student_id(params: &MatchitParams<'_, '_>) -> Result<i64, RouterError> {
    let raw = params.get("id").unwrap_or_default();
    raw.parse::<i64>()
        .map_err(|e| RouterError::BadRequest(format!("invalid student id '{}': {}", raw, e)))
}

/// Map DbError to appropriate RouterError
pub fn map_db_error_to_router_error(e: DbError) -> RouterError {
    match e {
        DbError::StudentNotFound { .. } => RouterError::NotFound(e.to_string()),
        DbError::NoFieldsToUpdate | DbError::Validation(_) => {
            RouterError::Validation(e.to_string())
        }
        DbError::TypeMismatch { .. } | DbError::Sqlx(_) => {
            RouterError::InternalError(e.to_string())
        }
    }
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: StatusCode, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Serializes `data` and wraps it in a JSON response.
pub fn json_response<T: Serialize>(
    status: StatusCode,
    data: &T,
) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(data)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(status, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use http_body_util::Full;
    use hyper::body::Frame;
    use students_core::error::SqlxError;
    use students_core::model::StudentPatch;
    use students_core::validation::{FieldViolation, ViolationKind};

    #[test]
    fn test_parse_json_body() {
        for empty in [&b""[..], &b"   "[..], &b"\n\t"[..]] {
            match parse_json_body::<StudentPatch>(empty) {
                Err(RouterError::BadRequest(msg)) => assert_eq!(msg, "empty body"),
                other => panic!("expected empty body error, got {:?}", other),
            }
        }

        assert!(matches!(
            parse_json_body::<StudentPatch>(b"{not json"),
            Err(RouterError::BadRequest(_))
        ));
        assert!(matches!(
            parse_json_body::<StudentPatch>(b"[1, 2]"),
            Err(RouterError::BadRequest(_))
        ));

        let patch: StudentPatch = parse_json_body(br#"{"age": 30}"#).unwrap();
        assert_eq!(patch.age, Some(serde_json::json!(30)));
    }

    #[test]
    fn test_parse_student_id() {
        let mut router = matchit::Router::new();
        router.insert("/api/students/{id}", ()).unwrap();

        let matched = router.at("/api/students/42").unwrap();
        assert_eq!(parse_student_id(&matched.params).unwrap(), 42);

        for bad in [
            "/api/students/abc",
            "/api/students/1.5",
            "/api/students/99999999999999999999",
        ] {
            let matched = router.at(bad).unwrap();
            assert!(matches!(
                parse_student_id(&matched.params),
                Err(RouterError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn test_map_db_error_to_router_error() {
        assert!(matches!(
            map_db_error_to_router_error(DbError::StudentNotFound { id: 1 }),
            RouterError::NotFound(msg) if msg == "no student found with id 1"
        ));
        assert!(matches!(
            map_db_error_to_router_error(DbError::NoFieldsToUpdate),
            RouterError::Validation(msg) if msg == "no fields to update"
        ));
        assert!(matches!(
            map_db_error_to_router_error(DbError::Validation(vec![FieldViolation::new(
                "email",
                ViolationKind::Invalid
            )])),
            RouterError::Validation(msg) if msg == "field email is invalid"
        ));
        assert!(matches!(
            map_db_error_to_router_error(DbError::TypeMismatch {
                field: "age",
                expected: "integer",
                got: "string".into()
            }),
            RouterError::InternalError(_)
        ));
        assert!(matches!(
            map_db_error_to_router_error(DbError::Sqlx(SqlxError::PoolClosed)),
            RouterError::InternalError(_)
        ));
    }

    #[tokio::test]
    async fn test_read_request_body() {
        let req = Request::new(Full::new(Bytes::from_static(b"{\"name\":\"Ann\"}")));
        let body = read_request_body_with_timeout(req, 1000).await.unwrap();
        assert_eq!(&body[..], b"{\"name\":\"Ann\"}");
    }

    /// Body that never yields a frame, like a client that stalls mid-upload.
    struct StalledBody;

    impl Body for StalledBody {
        type Data = Bytes;
        type Error = Infallible;

        fn poll_frame(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Bytes>, Infallible>>> {
            Poll::Pending
        }
    }

    #[tokio::test]
    async fn test_read_request_body_times_out() {
        let req = Request::new(StalledBody);
        let result = read_request_body_with_timeout(req, 20).await;
        assert!(matches!(result, Err(RouterError::Timeout)));
    }
}
