use thiserror::Error;

/// 利用者アカウントのエラー
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Name must be between 2 and 50 characters")]
    InvalidName,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password must be at least 6 characters")]
    WeakPassword,

    /// メールアドレスが登録済み
    #[error("Email is already registered")]
    EmailTaken,

    /// メールアドレスまたはパスワードが一致しない
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User account is inactive")]
    UserInactive,

    #[error("User not found")]
    UserNotFound,

    /// 管理者権限が必要
    #[error("Administrator privileges required")]
    NotAuthorized,

    /// 未返却の貸出または未払いの延滞料金がある
    #[error("User has unreturned loans or unpaid fines")]
    HasOpenObligations,

    /// パスワードハッシュのエラー
    #[error("Security service error")]
    Security(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 永続化のエラー
    #[error("Persistence error")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, AccountError>;
