//! Generic SeaORM repository bound to a unit-of-work transaction

use sea_orm::{
    ActiveModelTrait, DatabaseTransaction, EntityTrait, Order, QueryFilter, QueryOrder, Select,
};

use super::criteria::{Criteria, LogicalOperator};
use super::persistable::Persistable;
use super::relations;
use crate::domain::DomainError;

/// Composable query surface over one record type.
///
/// A repository borrows the transaction of the unit of work that created it,
/// so it can neither outlive nor leave its scope. Writes are staged in that
/// transaction and become visible to other scopes only after commit.
pub struct Repository<'t, R: Persistable> {
    txn: &'t DatabaseTransaction,
    query: Select<R::Entity>,
    eager: bool,
}

impl<'t, R: Persistable> Repository<'t, R> {
    pub fn new(txn: &'t DatabaseTransaction) -> Self {
        Self {
            txn,
            query: R::Entity::find(),
            eager: false,
        }
    }

    /// Stage `entity` for insertion, together with any children it holds.
    /// Returns the staged record carrying its assigned id.
    pub async fn add(&self, entity: &R) -> Result<R, DomainError> {
        let mut staged = entity.clone();
        relations::stage(self.txn, &mut staged, true).await?;
        tracing::debug!("Staged insert of {}", staged);
        Ok(staged)
    }

    /// Stage the current state of a stored `entity` (an insert if it was
    /// never stored). Children held in its collections are re-pointed at it.
    pub async fn save(&self, entity: &R) -> Result<R, DomainError> {
        let mut staged = entity.clone();
        let insert = staged.id().is_none();
        relations::stage(self.txn, &mut staged, insert).await?;
        tracing::debug!("Staged update of {}", staged);
        Ok(staged)
    }

    /// Stage deletion of `entity` and everything it owns.
    pub async fn delete(&self, entity: &R) -> Result<(), DomainError> {
        if entity.id().is_none() {
            return Err(DomainError::NotFound);
        }
        relations::remove_relations(self.txn, entity).await?;
        let result = entity.to_active_model().delete(self.txn).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }
        tracing::debug!("Staged delete of {}", entity);
        Ok(())
    }

    /// Narrow the query, joining a sequence of predicates with AND.
    pub fn filter(self, condition: impl Into<Criteria>) -> Result<Self, DomainError> {
        self.filter_with(condition, LogicalOperator::And)
    }

    /// Narrow the query, joining a sequence of predicates with `operator`.
    /// Repeated calls further restrict the query.
    pub fn filter_with(
        mut self,
        condition: impl Into<Criteria>,
        operator: LogicalOperator,
    ) -> Result<Self, DomainError> {
        let condition = condition.into().into_condition(operator)?;
        self.query = self.query.filter(condition);
        Ok(self)
    }

    pub fn order_by(mut self, column: <R::Entity as EntityTrait>::Column, order: Order) -> Self {
        self.query = self.query.order_by(column, order);
        self
    }

    /// Fetch the owned collections of every result, transitively, with one
    /// query per relation instead of one per row. Existing filters are kept.
    pub fn load_children(mut self) -> Self {
        self.eager = true;
        self
    }

    /// First matching record, if any.
    pub async fn get(&self) -> Result<Option<R>, DomainError> {
        let Some(model) = self.query.clone().one(self.txn).await? else {
            return Ok(None);
        };

        let mut record = R::from_model(model);
        if self.eager {
            relations::load_relations(self.txn, std::slice::from_mut(&mut record)).await?;
        }
        Ok(Some(record))
    }

    /// All matching records, in query order.
    pub async fn list(&self) -> Result<Vec<R>, DomainError> {
        let models = self.query.clone().all(self.txn).await?;
        tracing::debug!("{} query returned {} row(s)", R::KIND, models.len());

        let mut records: Vec<R> = models.into_iter().map(R::from_model).collect();
        if self.eager {
            relations::load_relations(self.txn, &mut records).await?;
        }
        Ok(records)
    }
}
