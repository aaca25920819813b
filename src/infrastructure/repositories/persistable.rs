//! Mapping between domain records and their SeaORM rows

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, FromQueryResult, IntoActiveModel,
    ModelTrait,
};

use super::relations::OwnedRelation;
use crate::domain::Record;

/// A record the generic repository knows how to store and load.
///
/// Owned collections are declared through [`Persistable::relations`]; the
/// repository walks that table for eager loading, cascading deletes and
/// saving children, so no per-entity query code is needed.
pub trait Persistable: Record {
    type Entity: EntityTrait<Model = Self::Model>;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModel>
        + Send
        + Sync;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + Sync;

    /// Primary key column, used for stable ordering of loaded children
    fn id_column() -> <Self::Entity as EntityTrait>::Column;

    fn from_model(model: Self::Model) -> Self;

    fn to_active_model(&self) -> Self::ActiveModel;

    /// Copy the storage-assigned id and timestamps of a written row back
    /// onto the record, leaving its collections alone.
    fn apply_row(&mut self, model: Self::Model);

    /// Owned collections of this record type. Empty for leaf records.
    fn relations() -> &'static [OwnedRelation<Self>] {
        &[]
    }
}
