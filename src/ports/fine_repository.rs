use crate::domain::{Fine, FineId, ItemKind, UserId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 延滞料金リポジトリポート
///
/// 書籍・CDの延滞料金は種別ごとに独立したストアに保存される。
#[async_trait]
pub trait FineRepository: Send + Sync {
    /// 延滞料金を保存する（IDがなければ種別の接頭辞で割り当てる）
    async fn save(&self, fine: &mut Fine) -> Result<()>;

    /// 既存の延滞料金を更新する
    ///
    /// IDが未登録の場合は `Ok(false)`。
    async fn update(&self, fine: &Fine) -> Result<bool>;

    /// IDで延滞料金を取得する
    async fn find_by_id(&self, kind: ItemKind, fine_id: &FineId) -> Option<Fine>;

    /// 利用者の全延滞料金を取得する
    async fn find_by_user_id(&self, kind: ItemKind, user_id: &UserId) -> Vec<Fine>;

    /// 未払いの延滞料金を取得する
    async fn find_unpaid(&self, kind: ItemKind) -> Vec<Fine>;

    /// 全延滞料金を取得する
    async fn find_all(&self, kind: ItemKind) -> Vec<Fine>;
}
