//! Owner → owned relationship descriptors and the routines that walk them
//!
//! Each record type declares a static table of [`OwnedRelation`]s. Loading
//! runs one query per relation edge for a whole batch of parents (select-in
//! style), recursing into the child type's own table, so the number of
//! queries depends on the shape of the entity graph and never on row counts.

use chrono::Utc;
use futures::future::BoxFuture;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::collections::HashMap;

use super::persistable::Persistable;

pub type RelationFuture<'a> = BoxFuture<'a, Result<(), DbErr>>;

/// One owned collection of a parent record type `P`.
pub struct OwnedRelation<P> {
    pub name: &'static str,
    /// Fill this collection on every parent of the batch with one query.
    pub load: for<'a> fn(&'a DatabaseTransaction, &'a mut [P]) -> RelationFuture<'a>,
    /// Point every child held in the collection at the parent and stage it.
    pub sync: for<'a> fn(&'a DatabaseTransaction, &'a mut P) -> RelationFuture<'a>,
    /// Delete every stored child owned by the parent, recursively.
    pub remove: for<'a> fn(&'a DatabaseTransaction, &'a P) -> RelationFuture<'a>,
}

/// Eagerly load every owned collection of `records`, recursively.
pub fn load_relations<'a, R: Persistable>(
    txn: &'a DatabaseTransaction,
    records: &'a mut [R],
) -> RelationFuture<'a> {
    Box::pin(async move {
        if records.is_empty() {
            return Ok(());
        }
        for relation in R::relations() {
            tracing::debug!(
                "Eager-loading {}.{} for {} parent(s)",
                R::KIND,
                relation.name,
                records.len()
            );
            (relation.load)(txn, &mut *records).await?;
        }
        Ok(())
    })
}

/// Insert or update `record`, then stage the children it holds.
///
/// `insert` forces an INSERT even when the record already carries an id.
pub fn stage<'a, R: Persistable>(
    txn: &'a DatabaseTransaction,
    record: &'a mut R,
    insert: bool,
) -> RelationFuture<'a> {
    Box::pin(async move {
        record.touch(Utc::now());
        let active = record.to_active_model();
        let row = if insert {
            active.insert(txn).await?
        } else {
            active.update(txn).await?
        };
        record.apply_row(row);

        for relation in R::relations() {
            (relation.sync)(txn, &mut *record).await?;
        }
        Ok(())
    })
}

/// Delete the stored children of `record` across all its relations.
pub fn remove_relations<'a, R: Persistable>(
    txn: &'a DatabaseTransaction,
    record: &'a R,
) -> RelationFuture<'a> {
    Box::pin(async move {
        for relation in R::relations() {
            (relation.remove)(txn, record).await?;
        }
        Ok(())
    })
}

/// Load the `C` children of a batch of `P` parents with a single query.
pub async fn load_owned<P, C>(
    txn: &DatabaseTransaction,
    parents: &mut [P],
    foreign_key: <C::Entity as EntityTrait>::Column,
    owner_of: fn(&C) -> Option<i32>,
    collection: fn(&mut P) -> &mut Vec<C>,
) -> Result<(), DbErr>
where
    P: Persistable,
    C: Persistable,
{
    let parent_ids: Vec<i32> = parents.iter().filter_map(|p| p.id()).collect();
    if parent_ids.is_empty() {
        return Ok(());
    }

    let rows = C::Entity::find()
        .filter(foreign_key.is_in(parent_ids))
        .order_by_asc(C::id_column())
        .all(txn)
        .await?;

    let mut children: Vec<C> = rows.into_iter().map(C::from_model).collect();
    load_relations(txn, &mut children).await?;

    let mut by_owner: HashMap<i32, Vec<C>> = HashMap::new();
    for child in children {
        if let Some(owner) = owner_of(&child) {
            by_owner.entry(owner).or_default().push(child);
        }
    }

    for parent in parents.iter_mut() {
        if let Some(id) = parent.id() {
            *collection(parent) = by_owner.remove(&id).unwrap_or_default();
        }
    }
    Ok(())
}

/// Stage every child held in a parent's collection, pointing its
/// back-reference at the parent.
pub async fn sync_owned<P, C>(
    txn: &DatabaseTransaction,
    parent: &mut P,
    set_owner: fn(&mut C, Option<i32>),
    collection: fn(&mut P) -> &mut Vec<C>,
) -> Result<(), DbErr>
where
    P: Persistable,
    C: Persistable,
{
    let owner = parent.id();
    for child in collection(parent).iter_mut() {
        set_owner(child, owner);
        let insert = child.id().is_none();
        stage(txn, child, insert).await?;
    }
    Ok(())
}

/// Delete all `C` rows owned by `parent`, after their own children.
pub async fn remove_owned<P, C>(
    txn: &DatabaseTransaction,
    parent: &P,
    foreign_key: <C::Entity as EntityTrait>::Column,
) -> Result<(), DbErr>
where
    P: Persistable,
    C: Persistable,
{
    let Some(owner) = parent.id() else {
        return Ok(());
    };

    if !C::relations().is_empty() {
        let rows = C::Entity::find()
            .filter(foreign_key.eq(owner))
            .all(txn)
            .await?;
        for row in rows {
            let child = C::from_model(row);
            remove_relations(txn, &child).await?;
        }
    }

    let result = C::Entity::delete_many()
        .filter(foreign_key.eq(owner))
        .exec(txn)
        .await?;
    tracing::debug!(
        "Cascade removed {} {} row(s) owned by {} {}",
        result.rows_affected,
        C::KIND,
        P::KIND,
        owner
    );
    Ok(())
}
