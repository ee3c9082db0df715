use crate::domain::{Fine, FineId, ItemKind, UserId};
use crate::ports::fine_repository::{FineRepository as FineRepositoryTrait, Result};
use async_trait::async_trait;
use std::path::Path;

use super::ByKind;
use super::store::{IdFormat, JsonStore};

/// FineRepositoryのJSONファイル実装
///
/// 書籍は fines.json、CDは cdfines.json に保存する。
pub struct FineRepository {
    stores: ByKind<JsonStore<Fine>>,
}

impl FineRepository {
    pub async fn open(data_dir: &Path) -> Self {
        Self {
            stores: ByKind {
                book: JsonStore::open(
                    data_dir.join("fines.json"),
                    IdFormat::new(ItemKind::Book.fine_prefix(), 1000),
                )
                .await,
                cd: JsonStore::open(
                    data_dir.join("cdfines.json"),
                    IdFormat::new(ItemKind::Cd.fine_prefix(), 1000),
                )
                .await,
            },
        }
    }
}

#[async_trait]
impl FineRepositoryTrait for FineRepository {
    async fn save(&self, fine: &mut Fine) -> Result<()> {
        self.stores.get(fine.kind()).save(fine).await
    }

    async fn update(&self, fine: &Fine) -> Result<bool> {
        self.stores.get(fine.kind()).update(fine).await
    }

    async fn find_by_id(&self, kind: ItemKind, fine_id: &FineId) -> Option<Fine> {
        self.stores.get(kind).get(fine_id.as_str()).await
    }

    async fn find_by_user_id(&self, kind: ItemKind, user_id: &UserId) -> Vec<Fine> {
        self.stores
            .get(kind)
            .filter(|fine| fine.user_id() == user_id)
            .await
    }

    async fn find_unpaid(&self, kind: ItemKind) -> Vec<Fine> {
        self.stores.get(kind).filter(|fine| fine.is_unpaid()).await
    }

    async fn find_all(&self, kind: ItemKind) -> Vec<Fine> {
        self.stores.get(kind).values().await
    }
}
