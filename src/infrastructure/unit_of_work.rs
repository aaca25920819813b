//! SeaORM implementation of the unit of work
//!
//! Opening a scope checks a connection out of the pool and begins a
//! transaction on it. Every repository handed out by the scope runs on that
//! one transaction. Commit and rollback finish the transaction and release
//! its connection; the next repository request begins a fresh one. Dropping
//! the scope returns the connection; a transaction still open at that point
//! is rolled back by SeaORM's drop guard, so early returns, `?` propagation
//! and task cancellation never leave partial writes.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tokio::sync::OnceCell;

use crate::domain::{DomainError, UnitOfWork};
use crate::infrastructure::repositories::{Persistable, Repository};
use crate::models::{Book, Item, Reader};

pub struct SeaOrmUnitOfWork {
    db: DatabaseConnection,
    txn: OnceCell<DatabaseTransaction>,
}

impl SeaOrmUnitOfWork {
    /// Open a scope on the given engine handle.
    pub async fn begin(db: &DatabaseConnection) -> Result<Self, DomainError> {
        let txn = db.begin().await?;
        tracing::debug!("Unit of work opened");
        Ok(Self {
            db: db.clone(),
            txn: OnceCell::new_with(Some(txn)),
        })
    }

    /// Current transaction, begun on demand after a commit or rollback.
    async fn transaction(&self) -> Result<&DatabaseTransaction, DomainError> {
        let txn = self
            .txn
            .get_or_try_init(|| async {
                tracing::debug!("Unit of work continuing on a new transaction");
                self.db.begin().await
            })
            .await?;
        Ok(txn)
    }

    /// Repository for any record type, bound to this scope's transaction.
    pub async fn repository<R: Persistable>(&self) -> Result<Repository<'_, R>, DomainError> {
        Ok(Repository::new(self.transaction().await?))
    }

    pub async fn readers(&self) -> Result<Repository<'_, Reader>, DomainError> {
        self.repository().await
    }

    pub async fn books(&self) -> Result<Repository<'_, Book>, DomainError> {
        self.repository().await
    }

    pub async fn items(&self) -> Result<Repository<'_, Item>, DomainError> {
        self.repository().await
    }

    /// Whether a transaction is currently held by this scope.
    pub fn in_transaction(&self) -> bool {
        self.txn.initialized()
    }

    /// Leave the scope, discarding anything not yet committed.
    pub async fn close(mut self) -> Result<(), DomainError> {
        if let Some(txn) = self.txn.take() {
            txn.rollback().await?;
        }
        tracing::debug!("Unit of work closed");
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn commit(&mut self) -> Result<(), DomainError> {
        let Some(txn) = self.txn.take() else {
            return Ok(());
        };
        if let Err(e) = txn.commit().await {
            tracing::error!("Commit failed: {}", e);
            return Err(e.into());
        }
        tracing::debug!("Unit of work committed");
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DomainError> {
        if let Some(txn) = self.txn.take() {
            txn.rollback().await?;
            tracing::debug!("Unit of work rolled back");
        }
        Ok(())
    }
}
