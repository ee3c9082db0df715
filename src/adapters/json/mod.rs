mod records;

pub mod catalog;
pub mod fine_repository;
pub mod loan_repository;
pub mod store;
pub mod user_repository;

pub use catalog::Catalog;
pub use fine_repository::FineRepository;
pub use loan_repository::LoanRepository;
pub use store::JsonStore;
pub use user_repository::UserRepository;

use crate::domain::ItemKind;
use std::path::Path;
use std::sync::Arc;

/// 種別（書籍・CD）ごとに1つずつ値を持つ
pub(crate) struct ByKind<T> {
    pub book: T,
    pub cd: T,
}

impl<T> ByKind<T> {
    pub fn get(&self, kind: ItemKind) -> &T {
        match kind {
            ItemKind::Book => &self.book,
            ItemKind::Cd => &self.cd,
        }
    }
}

/// データディレクトリ配下のJSONストア一式
pub struct JsonRepositories {
    pub users: Arc<UserRepository>,
    pub loans: Arc<LoanRepository>,
    pub fines: Arc<FineRepository>,
    pub catalog: Arc<Catalog>,
}

impl JsonRepositories {
    /// データディレクトリのストアをすべて開く
    pub async fn open(data_dir: &Path) -> Self {
        tracing::debug!("Opening JSON stores in {}", data_dir.display());

        Self {
            users: Arc::new(UserRepository::open(data_dir.join("users.json")).await),
            loans: Arc::new(LoanRepository::open(data_dir).await),
            fines: Arc::new(FineRepository::open(data_dir).await),
            catalog: Arc::new(Catalog::open(data_dir).await),
        }
    }
}
