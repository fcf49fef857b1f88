//! Matchit routing configuration.

use std::fmt::Display;
use std::sync::Arc;

use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use matchit::Router as MatchitRouter;
use students_core::config::AppConfig;
use students_core::Storage;
use thiserror::Error;

use crate::handlers;
use crate::handlers::response::{error_response, STATUS_ERROR, STATUS_VALIDATION_ERROR};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Student storage engine
    pub storage: Arc<dyn Storage>,
    /// Service configuration
    pub config: Arc<AppConfig>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with the student routes registered.
    pub fn new(storage: Arc<dyn Storage>, config: Arc<AppConfig>) -> Self {
        let mut router = MatchitRouter::new();

        router
            .insert("/api/students", RouteHandler::Students)
            .expect("Failed to insert /api/students route");
        router
            .insert("/api/students/{id}", RouteHandler::Students)
            .expect("Failed to insert /api/students/{id} route");

        Self {
            inner: router,
            state: AppState { storage, config },
        }
    }

    /// Routes a request and converts any failure into its JSON error response.
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Bytes>
    where
        B: Body<Data = Bytes>,
        B::Error: Display,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        match self.route(req).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%method, %path, error = %err, "Request failed");
                Response::from(err)
            }
        }
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// # Arguments
    /// * `req` - HTTP request
    ///
    /// # Returns
    /// `Result<Response<Bytes>, RouterError>` containing the response or an error.
    pub async fn route<B>(&self, req: Request<B>) -> Result<Response<Bytes>, RouterError>
    where
        B: Body<Data = Bytes>,
        B::Error: Display,
    {
        let path = req.uri().path().to_string();

        match self.inner.at(&path) {
            Ok(matched) => {
                matched
                    .value
                    .handle(req, matched.params, self.state.clone())
                    .await
            }
            Err(_) => Err(RouterError::NotFound(format!(
                "No route found for {}",
                path
            ))),
        }
    }
}

/// Route handler function.
enum RouteHandler {
    Students,
}

impl RouteHandler {
    /// Handles a request with the given route parameters.
    async fn handle<B>(
        &self,
        req: Request<B>,
        params: matchit::Params<'_, '_>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError>
    where
        B: Body<Data = Bytes>,
        B::Error: Display,
    {
        match self {
            RouteHandler::Students => {
                let has_id_param = params.get("id").is_some();
                let method = req.method().clone();
                match (method, has_id_param) {
                    (Method::POST, false) => handlers::create_student(req, params, state).await,
                    (Method::GET, false) => handlers::list_students(req, params, state).await,
                    (Method::GET, true) => handlers::get_student(req, params, state).await,
                    (Method::PUT, true) => handlers::update_student(req, params, state).await,
                    (Method::DELETE, true) => handlers::delete_student(req, params, state).await,
                    _ => Err(RouterError::MethodNotAllowed),
                }
            }
        }
    }
}

/// Router error type.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Internal Error: {0}")]
    InternalError(String),
    #[error("Request Timeout")]
    Timeout,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Validation Error: {0}")]
    Validation(String),
    #[error("Not Found: {0}")]
    NotFound(String),
}

impl RouterError {
    /// HTTP status, error body label and client-facing message.
    fn parts(&self) -> (StatusCode, &'static str, &str) {
        match self {
            RouterError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, STATUS_ERROR, "method not allowed")
            }
            RouterError::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, STATUS_ERROR, msg.as_str())
            }
            RouterError::Timeout => (StatusCode::REQUEST_TIMEOUT, STATUS_ERROR, "request timeout"),
            RouterError::BadRequest(msg) => (StatusCode::BAD_REQUEST, STATUS_ERROR, msg.as_str()),
            RouterError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, STATUS_VALIDATION_ERROR, msg.as_str())
            }
            RouterError::NotFound(msg) => (StatusCode::NOT_FOUND, STATUS_ERROR, msg.as_str()),
        }
    }
}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let (status, label, message) = err.parts();

        let error_response = error_response(label, message);
        let body = serde_json::to_vec(&error_response).unwrap_or_else(|e| {
            format!(
                "{{\"status\":\"Error\",\"error\":\"Failed to serialize error: {}\"}}",
                e
            )
            .into_bytes()
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Bytes::from(body))
            .unwrap_or_else(|_| {
                let mut fallback = Response::new(Bytes::from("Internal Server Error"));
                *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }
}
