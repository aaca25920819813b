use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::types::{decode_int, encode_int, timestamp_from_storage, timestamp_to_storage};
use crate::domain::Record;
use crate::domain::record::display_id;
use crate::infrastructure::repositories::Persistable;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    /// Engine-assigned rowid, stored unscaled
    #[sea_orm(primary_key)]
    pub id: i32,
    pub create_dt: String,
    pub update_dt: String,
    pub reader_id: Option<i32>,
    pub name: String,
    pub author: String,
    pub release_year: i64, // fixed-point, scaled by 10^4
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reader::Entity",
        from = "Column::ReaderId",
        to = "super::reader::Column::Id",
        on_delete = "Cascade"
    )]
    Reader,
}

impl Related<super::reader::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reader.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A book, optionally owned by a reader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Option<i32>,
    pub name: String,
    pub author: String,
    pub release_year: i32,
    /// Owning reader, `None` while the book is unowned
    pub reader_id: Option<i32>,
    pub create_dt: Option<DateTime<Utc>>,
    pub update_dt: Option<DateTime<Utc>>,
}

impl Book {
    pub fn new(name: impl Into<String>, author: impl Into<String>, release_year: i32) -> Self {
        Self {
            id: None,
            name: name.into(),
            author: author.into(),
            release_year,
            reader_id: None,
            create_dt: None,
            update_dt: None,
        }
    }

    pub fn owned_by(mut self, reader_id: Option<i32>) -> Self {
        self.reader_id = reader_id;
        self
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Book(id={}, name={}, author={})>",
            display_id(self.id),
            self.name,
            self.author
        )
    }
}

impl Record for Book {
    const KIND: &'static str = "Book";

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn create_dt(&self) -> Option<DateTime<Utc>> {
        self.create_dt
    }

    fn update_dt(&self) -> Option<DateTime<Utc>> {
        self.update_dt
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.create_dt.get_or_insert(now);
        self.update_dt = Some(now);
    }
}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            name: model.name,
            author: model.author,
            release_year: decode_int(model.release_year),
            reader_id: model.reader_id,
            create_dt: timestamp_from_storage(&model.create_dt),
            update_dt: timestamp_from_storage(&model.update_dt),
        }
    }
}

impl From<&Book> for ActiveModel {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.map_or(NotSet, Set),
            create_dt: book
                .create_dt
                .as_ref()
                .map_or(NotSet, |dt| Set(timestamp_to_storage(dt))),
            update_dt: book
                .update_dt
                .as_ref()
                .map_or(NotSet, |dt| Set(timestamp_to_storage(dt))),
            reader_id: Set(book.reader_id),
            name: Set(book.name.clone()),
            author: Set(book.author.clone()),
            release_year: Set(encode_int(book.release_year)),
        }
    }
}

impl Persistable for Book {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;

    fn id_column() -> Column {
        Column::Id
    }

    fn from_model(model: Model) -> Self {
        Book::from(model)
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel::from(self)
    }

    fn apply_row(&mut self, model: Model) {
        self.id = Some(model.id);
        self.create_dt = timestamp_from_storage(&model.create_dt);
        self.update_dt = timestamp_from_storage(&model.update_dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_follows_identity_only() {
        let mut a = Book::new("Dune", "Frank Herbert", 1965);
        let mut b = Book::new("Emma", "Jane Austen", 1815);
        a.id = Some(7);
        b.id = Some(7);
        assert_eq!(a, b);

        b.id = Some(8);
        assert_ne!(a, b);

        let set: HashSet<Book> = [a.clone(), a.clone().owned_by(Some(3))].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn display_shows_identity_and_title() {
        let mut book = Book::new("Dune", "Frank Herbert", 1965);
        assert_eq!(book.to_string(), "<Book(id=unsaved, name=Dune, author=Frank Herbert)>");
        book.id = Some(1);
        assert_eq!(book.to_string(), "<Book(id=1, name=Dune, author=Frank Herbert)>");
    }

    #[test]
    fn release_year_is_stored_scaled() {
        let book = Book::new("Dune", "Frank Herbert", 1965);
        let active = ActiveModel::from(&book);
        assert_eq!(active.release_year, Set(19_650_000));
        assert_eq!(active.id, NotSet);
    }

    #[test]
    fn touch_keeps_creation_time() {
        let mut book = Book::new("Dune", "Frank Herbert", 1965);
        let first = Utc::now();
        book.touch(first);
        let later = first + chrono::Duration::seconds(5);
        book.touch(later);
        assert_eq!(book.create_dt, Some(first));
        assert_eq!(book.update_dt, Some(later));
    }
}
