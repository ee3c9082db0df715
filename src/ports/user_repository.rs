use crate::domain::{User, UserId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 利用者リポジトリポート
///
/// 読み取りはメモリ上のマップから行うため失敗しない。
/// 書き込みはストア全体の書き戻しに失敗した場合のみエラーを返す。
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 利用者を保存する（IDがなければ割り当てる）
    async fn save(&self, user: &mut User) -> Result<()>;

    /// IDで利用者を取得する
    async fn find_by_id(&self, user_id: &UserId) -> Option<User>;

    /// メールアドレスで利用者を取得する
    async fn find_by_email(&self, email: &str) -> Option<User>;

    /// 全利用者を取得する（ID順）
    async fn find_all(&self) -> Vec<User>;

    /// 利用者を物理削除する
    ///
    /// 存在しなかった場合は `Ok(false)`。
    async fn delete(&self, user_id: &UserId) -> Result<bool>;
}
