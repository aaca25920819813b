pub mod book;
pub mod item;
pub mod reader;
pub(crate) mod types;

pub use book::Book;
pub use item::Item;
pub use reader::Reader;
