//! Unit of work contract
//!
//! A unit of work is one transactional scope. Everything staged through the
//! repositories it hands out becomes durable on `commit` and is discarded on
//! `rollback` or when the scope is dropped without committing.

use async_trait::async_trait;

use super::DomainError;

#[async_trait]
pub trait UnitOfWork: Send {
    /// Atomically apply every change staged since the scope opened or since
    /// the previous commit.
    async fn commit(&mut self) -> Result<(), DomainError>;

    /// Discard every change staged since the scope opened or since the
    /// previous commit. Earlier commits are unaffected.
    async fn rollback(&mut self) -> Result<(), DomainError>;
}
