//! Services Layer
//!
//! Business logic extracted from HTTP handlers: client lifecycle, conversion
//! recording and dashboard aggregation.

pub mod client_service;
pub mod conversion_service;
pub mod metrics_service;

use std::fmt;

/// Error type for service operations
#[derive(Debug)]
pub enum ServiceError {
    Database(String),
    NotFound,
    Validation(String),
    /// Email already registered. Kept distinct from `Database` so the API can
    /// answer 409 with a dedicated code instead of an opaque store error.
    DuplicateEmail,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Database(msg) => write!(f, "Database error: {}", msg),
            ServiceError::NotFound => write!(f, "Resource not found"),
            ServiceError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::DuplicateEmail => write!(f, "Email is already registered"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Database(e.to_string())
    }
}
