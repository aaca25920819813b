use library_lending::db;
use library_lending::domain::{DomainError, UnitOfWork};
use library_lending::infrastructure::SeaOrmUnitOfWork;
use library_lending::models::{Book, Reader, book, reader};
use library_lending::services;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use std::time::Duration;

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn reader_count(db: &DatabaseConnection) -> u64 {
    reader::Entity::find().count(db).await.unwrap()
}

#[tokio::test]
async fn test_dropped_scope_discards_staged_work() {
    let db = setup_test_db().await;

    {
        let uow = SeaOrmUnitOfWork::begin(&db).await.unwrap();
        uow.readers()
            .await
            .unwrap()
            .add(&Reader::new("Alice"))
            .await
            .unwrap();
        // No commit
    }

    assert_eq!(reader_count(&db).await, 0);
}

#[tokio::test]
async fn test_error_inside_scope_leaves_store_unchanged() {
    let db = setup_test_db().await;

    async fn failing_work(db: &DatabaseConnection) -> Result<(), DomainError> {
        let mut uow = SeaOrmUnitOfWork::begin(db).await?;
        uow.readers().await?.add(&Reader::new("Alice")).await?;
        uow.readers().await?.delete(&Reader::new("never stored")).await?;
        uow.commit().await
    }

    let result = failing_work(&db).await;
    assert!(matches!(result, Err(DomainError::NotFound)));
    assert_eq!(reader_count(&db).await, 0);
}

#[tokio::test]
async fn test_commit_then_rollback_keeps_committed_part() {
    let db = setup_test_db().await;

    {
        let mut uow = SeaOrmUnitOfWork::begin(&db).await.unwrap();
        uow.readers()
            .await
            .unwrap()
            .add(&Reader::new("Alice"))
            .await
            .unwrap();
        uow.commit().await.unwrap();

        uow.readers()
            .await
            .unwrap()
            .add(&Reader::new("Bob"))
            .await
            .unwrap();
        uow.rollback().await.unwrap();
        assert!(!uow.in_transaction());

        // The scope stays usable after rollback
        let names: Vec<String> = uow
            .readers()
            .await
            .unwrap()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Alice".to_string()]);
    }

    assert_eq!(reader_count(&db).await, 1);
}

#[tokio::test]
async fn test_commit_releases_connection_until_next_use() {
    let db = setup_test_db().await;

    let mut uow = SeaOrmUnitOfWork::begin(&db).await.unwrap();
    uow.readers()
        .await
        .unwrap()
        .add(&Reader::new("Alice"))
        .await
        .unwrap();
    uow.commit().await.unwrap();
    assert!(!uow.in_transaction());

    // Nothing is pending, so a second commit has nothing to do
    uow.commit().await.unwrap();
    assert!(!uow.in_transaction());

    // The committed scope holds no connection, so another scope can open
    // even on a single-connection pool
    let other = tokio::time::timeout(Duration::from_secs(5), SeaOrmUnitOfWork::begin(&db))
        .await
        .expect("second scope should open while the committed one is alive")
        .unwrap();
    let seen = other.readers().await.unwrap().list().await.unwrap();
    assert_eq!(seen.len(), 1);
    drop(other);

    // The next repository request begins a fresh transaction
    uow.readers()
        .await
        .unwrap()
        .add(&Reader::new("Bob"))
        .await
        .unwrap();
    assert!(uow.in_transaction());
    drop(uow);

    assert_eq!(reader_count(&db).await, 1);
}

#[tokio::test]
async fn test_service_write_leaves_no_transaction_behind() {
    let db = setup_test_db().await;

    services::create_reader(&db, "Alice").await.unwrap();

    // The pool connection is free again right after the service returns
    let uow = tokio::time::timeout(Duration::from_secs(5), SeaOrmUnitOfWork::begin(&db))
        .await
        .expect("connection should be released after commit")
        .unwrap();
    assert!(uow.in_transaction());
    let alice = uow
        .readers()
        .await
        .unwrap()
        .filter(reader::Column::Name.eq("Alice"))
        .unwrap()
        .get()
        .await
        .unwrap();
    assert!(alice.is_some());
}

#[tokio::test]
async fn test_close_discards_uncommitted_work() {
    let db = setup_test_db().await;

    let mut uow = SeaOrmUnitOfWork::begin(&db).await.unwrap();
    uow.books()
        .await
        .unwrap()
        .add(&Book::new("Dune", "Frank Herbert", 1965))
        .await
        .unwrap();
    uow.commit().await.unwrap();
    uow.books()
        .await
        .unwrap()
        .add(&Book::new("Hyperion", "Dan Simmons", 1989))
        .await
        .unwrap();
    uow.close().await.unwrap();

    let names: Vec<String> = book::Entity::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(names, vec!["Dune".to_string()]);
}

#[tokio::test]
async fn test_staged_writes_visible_within_scope() {
    let db = setup_test_db().await;
    let uow = SeaOrmUnitOfWork::begin(&db).await.unwrap();

    uow.readers()
        .await
        .unwrap()
        .add(&Reader::new("Alice"))
        .await
        .unwrap();

    let found = uow
        .readers()
        .await
        .unwrap()
        .filter(reader::Column::Name.eq("Alice"))
        .unwrap()
        .get()
        .await
        .unwrap();
    assert!(found.is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_scopes_are_independent() {
    let db = setup_test_db().await;

    let mut handles = Vec::new();
    for n in 0..8 {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            services::create_reader(&db, &format!("Reader {}", n)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(reader_count(&db).await, 8);
    let fifth = reader::Entity::find()
        .filter(reader::Column::Name.eq("Reader 5"))
        .one(&db)
        .await
        .unwrap();
    assert!(fifth.is_some());
}
