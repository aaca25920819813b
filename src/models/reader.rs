use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseTransaction, NotSet, Set};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::book::{self, Book};
use super::item::{self, Item};
use super::types::{timestamp_from_storage, timestamp_to_storage};
use crate::domain::Record;
use crate::domain::record::display_id;
use crate::infrastructure::repositories::Persistable;
use crate::infrastructure::repositories::relations::{
    OwnedRelation, RelationFuture, load_owned, remove_owned, sync_owned,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "readers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub create_dt: String,
    pub update_dt: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book::Entity")]
    Books,
    #[sea_orm(has_many = "super::item::Entity")]
    Items,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Books.def()
    }
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A library member and everything they own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reader {
    pub id: Option<i32>,
    pub name: String,
    pub books: Vec<Book>,
    pub items: Vec<Item>,
    pub create_dt: Option<DateTime<Utc>>,
    pub update_dt: Option<DateTime<Utc>>,
}

impl Reader {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_collections(name, &[], &[])
    }

    /// Build a reader holding copies of `books` and `items`; the caller's
    /// collections are never shared with the new reader.
    pub fn with_collections(name: impl Into<String>, books: &[Book], items: &[Item]) -> Self {
        Self {
            id: None,
            name: name.into(),
            books: books.to_vec(),
            items: items.to_vec(),
            create_dt: None,
            update_dt: None,
        }
    }
}

impl PartialEq for Reader {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Reader {}

impl Hash for Reader {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Reader(id={}, name={})>", display_id(self.id), self.name)
    }
}

impl Record for Reader {
    const KIND: &'static str = "Reader";

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

impl From<Model> for Reader {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            name: model.name,
            books: Vec::new(),
            items: Vec::new(),
            create_dt: timestamp_from_storage(&model.create_dt),
            update_dt: timestamp_from_storage(&model.update_dt),
        }
    }
}

impl From<&Reader> for ActiveModel {
    fn from(reader: &Reader) -> Self {
        Self {
            id: reader.id.map_or(NotSet, Set),
            create_dt: reader
                .create_dt
                .as_ref()
                .map_or(NotSet, |dt| Set(timestamp_to_storage(dt))),
            update_dt: reader
                .update_dt
                .as_ref()
                .map_or(NotSet, |dt| Set(timestamp_to_storage(dt))),
            name: Set(reader.name.clone()),
        }
    }
}

// Owned collections

fn books_of(reader: &mut Reader) -> &mut Vec<Book> {
    &mut reader.books
}

fn items_of(reader: &mut Reader) -> &mut Vec<Item> {
    &mut reader.items
}

fn book_owner(book: &Book) -> Option<i32> {
    book.reader_id
}

fn item_owner(item: &Item) -> Option<i32> {
    item.reader_id
}

fn set_book_owner(book: &mut Book, reader_id: Option<i32>) {
    book.reader_id = reader_id;
}

fn set_item_owner(item: &mut Item, reader_id: Option<i32>) {
    item.reader_id = reader_id;
}

fn load_books<'a>(txn: &'a DatabaseTransaction, readers: &'a mut [Reader]) -> RelationFuture<'a> {
    Box::pin(load_owned::<Reader, Book>(
        txn,
        readers,
        book::Column::ReaderId,
        book_owner,
        books_of,
    ))
}

fn load_items<'a>(txn: &'a DatabaseTransaction, readers: &'a mut [Reader]) -> RelationFuture<'a> {
    Box::pin(load_owned::<Reader, Item>(
        txn,
        readers,
        item::Column::ReaderId,
        item_owner,
        items_of,
    ))
}

fn sync_books<'a>(txn: &'a DatabaseTransaction, reader: &'a mut Reader) -> RelationFuture<'a> {
    Box::pin(sync_owned::<Reader, Book>(txn, reader, set_book_owner, books_of))
}

fn sync_items<'a>(txn: &'a DatabaseTransaction, reader: &'a mut Reader) -> RelationFuture<'a> {
    Box::pin(sync_owned::<Reader, Item>(txn, reader, set_item_owner, items_of))
}

fn remove_books<'a>(txn: &'a DatabaseTransaction, reader: &'a Reader) -> RelationFuture<'a> {
    Box::pin(remove_owned::<Reader, Book>(txn, reader, book::Column::ReaderId))
}

fn remove_items<'a>(txn: &'a DatabaseTransaction, reader: &'a Reader) -> RelationFuture<'a> {
    Box::pin(remove_owned::<Reader, Item>(txn, reader, item::Column::ReaderId))
}

static RELATIONS: [OwnedRelation<Reader>; 2] = [
    OwnedRelation {
        name: "books",
        load: load_books,
        sync: sync_books,
        remove: remove_books,
    },
    OwnedRelation {
        name: "items",
        load: load_items,
        sync: sync_items,
        remove: remove_items,
    },
];

impl Persistable for Reader {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;

    fn id_column() -> Column {
        Column::Id
    }

    fn from_model(model: Model) -> Self {
        Reader::from(model)
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel::from(self)
    }

    fn apply_row(&mut self, model: Model) {
        self.id = Some(model.id);
        self.create_dt = timestamp_from_storage(&model.create_dt);
        self.update_dt = timestamp_from_storage(&model.update_dt);
    }

    fn relations() -> &'static [OwnedRelation<Self>] {
        &RELATIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_reader_owns_nothing() {
        let reader = Reader::new("Alice");
        assert!(reader.books.is_empty());
        assert!(reader.items.is_empty());
        assert_eq!(reader.id, None);
    }

    #[test]
    fn supplied_collections_are_copied() {
        let mut shelf = vec![Book::new("Dune", "Frank Herbert", 1965)];
        let reader = Reader::with_collections("Alice", &shelf, &[]);

        shelf.push(Book::new("Emma", "Jane Austen", 1815));
        shelf[0].name = "Renamed".to_string();

        assert_eq!(reader.books.len(), 1);
        assert_eq!(reader.books[0].name, "Dune");
    }

    #[test]
    fn readers_are_equal_by_id_only() {
        let mut alice = Reader::new("Alice");
        let mut bob = Reader::new("Bob");
        alice.id = Some(1);
        bob.id = Some(1);
        assert_eq!(alice, bob);
        assert_eq!(alice.to_string(), "<Reader(id=1, name=Alice)>");
    }

    #[test]
    fn relation_table_lists_owned_collections() {
        let names: Vec<&str> = Reader::relations().iter().map(|r| r.name).collect();
        assert_eq!(names, ["books", "items"]);
        assert!(Book::relations().is_empty());
        assert!(Item::relations().is_empty());
    }
}
