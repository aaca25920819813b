//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and schema bootstrap (db)
//! - HTTP server setup (server)
//! - Configuration loading (config)
//! - Generic repository and relationship walking (repositories)
//! - Transactional scopes (unit_of_work)

pub mod config;
pub mod db;
pub mod repositories;
pub mod server;
pub mod unit_of_work;

pub use repositories::*;
pub use unit_of_work::SeaOrmUnitOfWork;
