use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// セキュリティサービスポート
///
/// パスワードのハッシュ化と検証を外部の実装に委ねる。
#[async_trait]
pub trait SecurityService: Send + Sync {
    /// パスワードをハッシュ化する
    async fn hash_password(&self, password: &str) -> Result<String>;

    /// パスワードがハッシュと一致するか検証する
    async fn verify_password(&self, password: &str, password_hash: &str) -> bool;
}
