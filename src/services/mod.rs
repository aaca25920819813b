//! Services Layer
//!
//! Use cases composed from unit-of-work and repository calls.
//! Services can be called directly or through Axum handlers.

pub mod book_service;
pub mod reader_service;

// Re-export for convenience
pub use book_service::*;
pub use reader_service::*;
