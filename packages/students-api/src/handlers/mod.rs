//! HTTP endpoint implementations for the student resource.

pub mod request_utils;
pub mod response;
mod student_handlers;

pub use student_handlers::{
    create_student, delete_student, get_student, list_students, update_student,
};
