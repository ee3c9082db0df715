use thiserror::Error;

/// 資料カタログユースケースのエラー
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Title must not be empty")]
    InvalidTitle,

    /// 著者（CDはアーティスト）が空
    #[error("Creator must not be empty")]
    InvalidCreator,

    /// 書籍にISBNがない、またはチェックディジットが合わない
    #[error("Invalid ISBN")]
    InvalidIsbn,

    /// 管理者権限が必要
    #[error("Administrator privileges required")]
    NotAuthorized,

    /// 永続化のエラー
    #[error("Persistence error")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
