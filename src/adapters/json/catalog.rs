use crate::domain::{Item, ItemId, ItemKind};
use crate::ports::catalog::{Catalog as CatalogTrait, Result};
use async_trait::async_trait;
use std::path::Path;

use super::ByKind;
use super::store::{IdFormat, JsonStore};

/// CatalogのJSONファイル実装
///
/// 書籍は books.json、CDは cds.json に保存する。
pub struct Catalog {
    stores: ByKind<JsonStore<Item>>,
}

impl Catalog {
    pub async fn open(data_dir: &Path) -> Self {
        Self {
            stores: ByKind {
                book: JsonStore::open(
                    data_dir.join("books.json"),
                    IdFormat::new(ItemKind::Book.item_prefix(), 1000),
                )
                .await,
                cd: JsonStore::open(
                    data_dir.join("cds.json"),
                    IdFormat::new(ItemKind::Cd.item_prefix(), 1000),
                )
                .await,
            },
        }
    }
}

#[async_trait]
impl CatalogTrait for Catalog {
    async fn save(&self, item: &mut Item) -> Result<()> {
        self.stores.get(item.kind).save(item).await
    }

    async fn find(&self, kind: ItemKind, item_id: &ItemId) -> Option<Item> {
        self.stores.get(kind).get(item_id.as_str()).await
    }

    async fn find_all(&self, kind: ItemKind) -> Vec<Item> {
        self.stores.get(kind).values().await
    }

    async fn set_available(
        &self,
        kind: ItemKind,
        item_id: &ItemId,
        available: bool,
    ) -> Result<bool> {
        let store = self.stores.get(kind);
        let Some(mut item) = store.get(item_id.as_str()).await else {
            return Ok(false);
        };

        item.available = available;
        store.update(&item).await
    }
}
