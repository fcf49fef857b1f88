//! Core storage engine for the students service.
//!
//! Provides the student data model, creation-time validation, the
//! partial-update statement builder, storage engines and configuration.

pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod update;
pub mod validation;

pub use model::{NewStudent, Student, StudentPatch};
pub use storage::{MemoryStorage, SqliteStorage, Storage};
