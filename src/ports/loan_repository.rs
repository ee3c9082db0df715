use crate::domain::{ItemId, ItemKind, Loan, LoanId, UserId};
use async_trait::async_trait;
use chrono::NaiveDateTime;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出リポジトリポート
///
/// 書籍とCDは種別ごとに独立したストアを持つ。すべての操作は種別を受け取り、
/// 該当するストアのみを対象とする。
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// 貸出を保存する（IDがなければ種別の接頭辞で割り当てる）
    async fn save(&self, loan: &mut Loan) -> Result<()>;

    /// 既存の貸出を更新する
    ///
    /// IDが未登録の場合は `Ok(false)`。
    async fn update(&self, loan: &Loan) -> Result<bool>;

    /// IDで貸出を取得する
    async fn find_by_id(&self, kind: ItemKind, loan_id: &LoanId) -> Option<Loan>;

    /// 利用者の全貸出を取得する
    async fn find_by_user_id(&self, kind: ItemKind, user_id: &UserId) -> Vec<Loan>;

    /// 資料の全貸出を取得する
    async fn find_by_item_id(&self, kind: ItemKind, item_id: &ItemId) -> Vec<Loan>;

    /// 延滞中の貸出を取得する
    ///
    /// 未返却かつ `now` が返却期限を過ぎている貸出を返す。
    async fn find_overdue(&self, kind: ItemKind, now: NaiveDateTime) -> Vec<Loan>;

    /// 全貸出を取得する
    async fn find_all(&self, kind: ItemKind) -> Vec<Loan>;
}
