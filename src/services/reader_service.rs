//! Reader Service - readers, their books and their items

use sea_orm::{ColumnTrait, DatabaseConnection};

use crate::domain::{DomainError, UnitOfWork};
use crate::infrastructure::SeaOrmUnitOfWork;
use crate::models::{Item, Reader, book, reader};

/// Register a new reader owning nothing
pub async fn create_reader(db: &DatabaseConnection, name: &str) -> Result<Reader, DomainError> {
    let mut uow = SeaOrmUnitOfWork::begin(db).await?;
    let reader = uow.readers().await?.add(&Reader::new(name)).await?;
    uow.commit().await?;

    tracing::info!("Created {}", reader);
    Ok(reader)
}

/// Fetch a reader by name with books and items loaded
pub async fn get_reader(
    db: &DatabaseConnection,
    reader_name: &str,
) -> Result<Option<Reader>, DomainError> {
    let uow = SeaOrmUnitOfWork::begin(db).await?;
    find_reader(&uow, reader_name).await
}

/// Hand the book named `book_name` to the reader named `reader_name`.
///
/// Both lookups complete before anything is mutated, so a missing reader or
/// book leaves the store untouched.
pub async fn buy_book(
    db: &DatabaseConnection,
    reader_name: &str,
    book_name: &str,
) -> Result<Reader, DomainError> {
    let mut uow = SeaOrmUnitOfWork::begin(db).await?;

    let mut reader = find_reader(&uow, reader_name)
        .await?
        .ok_or(DomainError::ReaderNotFound)?;

    let book = uow
        .books()
        .await?
        .filter(book::Column::Name.eq(book_name))?
        .get()
        .await?
        .ok_or(DomainError::BookNotFound)?;

    if !reader.books.contains(&book) {
        reader.books.push(book);
    }

    let reader = uow.readers().await?.save(&reader).await?;
    uow.commit().await?;

    tracing::info!("{} now owns {} book(s)", reader, reader.books.len());
    Ok(reader)
}

/// Create an item, optionally owned by the reader named `reader_name`
pub async fn create_item(
    db: &DatabaseConnection,
    name: &str,
    reader_name: Option<&str>,
) -> Result<Item, DomainError> {
    let mut uow = SeaOrmUnitOfWork::begin(db).await?;

    let owner = match reader_name {
        Some(reader_name) => {
            let reader = uow
                .readers()
                .await?
                .filter(reader::Column::Name.eq(reader_name))?
                .get()
                .await?
                .ok_or(DomainError::ReaderNotFound)?;
            reader.id
        }
        None => None,
    };

    let item = uow.items().await?.add(&Item::new(name).owned_by(owner)).await?;
    uow.commit().await?;

    tracing::info!("Created {}", item);
    Ok(item)
}

/// Remove a reader together with every book and item they own
pub async fn delete_reader(db: &DatabaseConnection, reader_name: &str) -> Result<(), DomainError> {
    let mut uow = SeaOrmUnitOfWork::begin(db).await?;

    let reader = uow
        .readers()
        .await?
        .filter(reader::Column::Name.eq(reader_name))?
        .get()
        .await?
        .ok_or(DomainError::ReaderNotFound)?;

    uow.readers().await?.delete(&reader).await?;
    uow.commit().await?;

    tracing::info!("Deleted {} and everything it owned", reader);
    Ok(())
}

async fn find_reader(
    uow: &SeaOrmUnitOfWork,
    reader_name: &str,
) -> Result<Option<Reader>, DomainError> {
    uow.readers()
        .await?
        .load_children()
        .filter(reader::Column::Name.eq(reader_name))?
        .get()
        .await
}

