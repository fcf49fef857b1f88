//! REST API server for the students service.
//!
//! Provides HTTP endpoints for student CRUD operations, request routing
//! and the hyper accept loop with graceful shutdown.

pub mod handlers;
pub mod router;
pub mod server;
