//! Book Service - Pure business logic without HTTP layer
//!
//! Every operation runs inside its own unit of work and commits before
//! returning. It can be called directly or through the HTTP handlers.

use sea_orm::{ColumnTrait, DatabaseConnection, Order};

use crate::domain::{DomainError, UnitOfWork};
use crate::infrastructure::SeaOrmUnitOfWork;
use crate::models::Book;
use crate::models::book::Column;

/// Fields of a partial book update; `None` keeps the stored value
#[derive(Debug, Default, Clone)]
pub struct BookChanges {
    pub name: Option<String>,
    pub author: Option<String>,
    pub release_year: Option<i32>,
}

/// Create a new, unowned book
pub async fn create_book(
    db: &DatabaseConnection,
    name: &str,
    author: &str,
    release_year: i32,
) -> Result<Book, DomainError> {
    let mut uow = SeaOrmUnitOfWork::begin(db).await?;
    let book = uow
        .books()
        .await?
        .add(&Book::new(name, author, release_year))
        .await?;
    uow.commit().await?;

    tracing::info!("Created {}", book);
    Ok(book)
}

/// List every book, ordered by id
pub async fn get_all_books(db: &DatabaseConnection) -> Result<Vec<Book>, DomainError> {
    let uow = SeaOrmUnitOfWork::begin(db).await?;
    let books = uow.books().await?.order_by(Column::Id, Order::Asc).list().await?;

    tracing::info!("Returning {} books", books.len());
    Ok(books)
}

/// Find a book by its name
pub async fn get_book(
    db: &DatabaseConnection,
    book_name: &str,
) -> Result<Option<Book>, DomainError> {
    let uow = SeaOrmUnitOfWork::begin(db).await?;
    let book = uow
        .books()
        .await?
        .filter(Column::Name.eq(book_name))?
        .get()
        .await?;
    Ok(book)
}

/// Apply a partial update to a stored book
pub async fn update_book(
    db: &DatabaseConnection,
    book_id: i32,
    changes: BookChanges,
) -> Result<Book, DomainError> {
    let mut uow = SeaOrmUnitOfWork::begin(db).await?;
    let mut book = uow
        .books()
        .await?
        .filter(Column::Id.eq(book_id))?
        .get()
        .await?
        .ok_or(DomainError::BookNotFound)?;

    if let Some(name) = changes.name {
        book.name = name;
    }
    if let Some(author) = changes.author {
        book.author = author;
    }
    if let Some(release_year) = changes.release_year {
        book.release_year = release_year;
    }

    let book = uow.books().await?.save(&book).await?;
    uow.commit().await?;

    tracing::info!("Updated {}", book);
    Ok(book)
}
