//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

#[derive(Debug)]
pub enum DomainError {
    /// A filter condition was neither a single predicate nor a non-empty sequence
    LogicalOperatorMustBeGiven,
    /// No reader matched the lookup
    ReaderNotFound,
    /// No book matched the lookup
    BookNotFound,
    /// The record has no stored row to act on
    NotFound,
    /// Database/persistence error
    Database(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::LogicalOperatorMustBeGiven => write!(
                f,
                "Filter condition must be a predicate or a non-empty sequence of predicates"
            ),
            DomainError::ReaderNotFound => write!(f, "Reader not found"),
            DomainError::BookNotFound => write!(f, "Book not found"),
            DomainError::NotFound => write!(f, "Resource not found"),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}
