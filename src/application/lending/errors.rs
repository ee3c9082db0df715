use crate::domain::{FineError, LoanError};
use rust_decimal::Decimal;
use thiserror::Error;

/// 貸出・延滞料金ユースケースのエラー
#[derive(Debug, Error)]
pub enum LendingError {
    /// 利用者が存在しない
    #[error("User not found")]
    UserNotFound,

    /// 利用者が無効化されている
    #[error("User account is inactive")]
    UserInactive,

    /// 資料が存在しない
    #[error("Item not found")]
    ItemNotFound,

    /// 資料が貸出中
    #[error("Item is not available for loan")]
    ItemNotAvailable,

    /// 未払いの延滞料金がある
    #[error("User has outstanding fines ({0:.2} NIS)")]
    OutstandingFines(Decimal),

    /// 貸出が見つからない
    #[error("Loan not found")]
    LoanNotFound,

    /// 返却済みの貸出
    #[error("Loan is already returned")]
    AlreadyReturned,

    /// 延滞料金が見つからない
    #[error("Fine not found")]
    FineNotFound,

    /// 支払額が0以下
    #[error("Payment amount must be positive")]
    InvalidPaymentAmount,

    /// 支払いが拒否された（残額超過または支払済み）
    #[error("Payment of {requested:.2} rejected (remaining {remaining:.2})")]
    PaymentRejected {
        requested: Decimal,
        remaining: Decimal,
    },

    /// 管理者権限が必要
    #[error("Administrator privileges required")]
    NotAuthorized,

    /// 返却期限が日付の範囲を超える
    #[error("Invalid loan date: {0}")]
    InvalidLoanDate(#[from] LoanError),

    /// ドメイン層のエラー
    #[error("Invalid fine: {0}")]
    InvalidFine(#[from] FineError),

    /// 永続化のエラー
    #[error("Persistence error")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// 貸出ユースケースの Result型
pub type Result<T> = std::result::Result<T, LendingError>;
