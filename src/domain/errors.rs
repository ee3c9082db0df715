use thiserror::Error;

/// 延滞料金の不正な引数
///
/// 事前条件違反は即座にエラーとし、黙って丸めることはしない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FineError {
    /// 利用者IDが未指定
    #[error("user id is required")]
    MissingUserId,

    /// 貸出IDが未指定
    #[error("loan id is required")]
    MissingLoanId,

    /// 作成時の金額が0以下
    #[error("fine amount must be positive")]
    NonPositiveAmount,

    /// 金額が負
    #[error("amount cannot be negative")]
    NegativeAmount,

    /// 支払済み金額が負
    #[error("paid amount cannot be negative")]
    NegativePaidAmount,

    /// 残額が負
    #[error("remaining amount cannot be negative")]
    NegativeRemainingAmount,
}

/// 貸出の日付計算のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoanError {
    /// 日付が表現可能な範囲を超える
    #[error("due date would be out of range ({days} days)")]
    DateOutOfRange { days: i64 },
}
