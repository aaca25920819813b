//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only trait definitions and domain error types.

pub mod errors;
pub mod record;
pub mod unit_of_work;

pub use errors::DomainError;
pub use record::Record;
pub use unit_of_work::UnitOfWork;
