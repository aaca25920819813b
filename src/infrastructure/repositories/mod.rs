//! Repository implementations using SeaORM

pub mod criteria;
pub mod persistable;
pub mod relations;
pub mod repository;

pub use criteria::{Criteria, LogicalOperator};
pub use persistable::Persistable;
pub use relations::{OwnedRelation, RelationFuture};
pub use repository::Repository;
