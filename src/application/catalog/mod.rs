mod catalog_service;
mod errors;

pub use catalog_service::{
    NewItem, add_item, items_by_creator, items_by_genre, list_items, search_items,
};
pub use errors::{CatalogError, Result};
