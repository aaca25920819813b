use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::types::{timestamp_from_storage, timestamp_to_storage};
use crate::domain::Record;
use crate::domain::record::display_id;
use crate::infrastructure::repositories::Persistable;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub create_dt: String,
    pub update_dt: String,
    pub reader_id: Option<i32>,
    pub name: String,
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

/// Anything a reader holds that is not a book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Option<i32>,
    pub name: String,
    pub reader_id: Option<i32>,
    pub create_dt: Option<DateTime<Utc>>,
    pub update_dt: Option<DateTime<Utc>>,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
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

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Item(id={}, name={})>", display_id(self.id), self.name)
    }
}

impl Record for Item {
    const KIND: &'static str = "Item";

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

impl From<Model> for Item {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            name: model.name,
            reader_id: model.reader_id,
            create_dt: timestamp_from_storage(&model.create_dt),
            update_dt: timestamp_from_storage(&model.update_dt),
        }
    }
}

impl From<&Item> for ActiveModel {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.map_or(NotSet, Set),
            create_dt: item
                .create_dt
                .as_ref()
                .map_or(NotSet, |dt| Set(timestamp_to_storage(dt))),
            update_dt: item
                .update_dt
                .as_ref()
                .map_or(NotSet, |dt| Set(timestamp_to_storage(dt))),
            reader_id: Set(item.reader_id),
            name: Set(item.name.clone()),
        }
    }
}

impl Persistable for Item {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;

    fn id_column() -> Column {
        Column::Id
    }

    fn from_model(model: Model) -> Self {
        Item::from(model)
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
