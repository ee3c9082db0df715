use crate::domain::{ItemId, ItemKind, Loan, LoanId, UserId};
use crate::ports::loan_repository::{LoanRepository as LoanRepositoryTrait, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::path::Path;

use super::ByKind;
use super::store::{IdFormat, JsonStore};

/// LoanRepositoryのJSONファイル実装
///
/// 書籍は loans.json、CDは cdloans.json に保存する。
pub struct LoanRepository {
    stores: ByKind<JsonStore<Loan>>,
}

impl LoanRepository {
    pub async fn open(data_dir: &Path) -> Self {
        Self {
            stores: ByKind {
                book: JsonStore::open(
                    data_dir.join("loans.json"),
                    IdFormat::new(ItemKind::Book.loan_prefix(), 1000),
                )
                .await,
                cd: JsonStore::open(
                    data_dir.join("cdloans.json"),
                    IdFormat::new(ItemKind::Cd.loan_prefix(), 1000),
                )
                .await,
            },
        }
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn save(&self, loan: &mut Loan) -> Result<()> {
        self.stores.get(loan.kind).save(loan).await
    }

    async fn update(&self, loan: &Loan) -> Result<bool> {
        self.stores.get(loan.kind).update(loan).await
    }

    async fn find_by_id(&self, kind: ItemKind, loan_id: &LoanId) -> Option<Loan> {
        self.stores.get(kind).get(loan_id.as_str()).await
    }

    async fn find_by_user_id(&self, kind: ItemKind, user_id: &UserId) -> Vec<Loan> {
        self.stores
            .get(kind)
            .filter(|loan| &loan.user_id == user_id)
            .await
    }

    async fn find_by_item_id(&self, kind: ItemKind, item_id: &ItemId) -> Vec<Loan> {
        self.stores
            .get(kind)
            .filter(|loan| &loan.item_id == item_id)
            .await
    }

    async fn find_overdue(&self, kind: ItemKind, now: NaiveDateTime) -> Vec<Loan> {
        self.stores
            .get(kind)
            .filter(|loan| loan.is_overdue(now))
            .await
    }

    async fn find_all(&self, kind: ItemKind) -> Vec<Loan> {
        self.stores.get(kind).values().await
    }
}
