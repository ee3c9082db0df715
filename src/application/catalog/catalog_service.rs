use validator::Validate;

use crate::domain::item::is_valid_isbn;
use crate::domain::{Item, ItemKind, Session};

use super::errors::{CatalogError, Result};
use crate::application::ServiceDependencies;

/// 追加する資料の入力
#[derive(Debug, Clone, Validate)]
pub struct NewItem {
    pub kind: ItemKind,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub creator: String,
    pub isbn: Option<String>,
    pub genre: Option<String>,
}

impl NewItem {
    pub fn new(kind: ItemKind, title: &str, creator: &str) -> Self {
        Self {
            kind,
            title: title.trim().to_string(),
            creator: creator.trim().to_string(),
            isbn: None,
            genre: None,
        }
    }

    pub fn isbn(mut self, isbn: &str) -> Self {
        self.isbn = Some(isbn.trim().to_string());
        self
    }

    pub fn genre(mut self, genre: &str) -> Self {
        let genre = genre.trim();
        self.genre = (!genre.is_empty()).then(|| genre.to_string());
        self
    }
}

/// 資料を追加する（管理者のみ）
///
/// ビジネスルール：
/// - タイトルと著者（アーティスト）は空でないこと
/// - 書籍は正しいISBNを持つこと。CDのISBNは任意だが、指定する場合は正しいこと
///
/// 追加した資料は貸出可能な状態で保存される。
pub async fn add_item(
    deps: &ServiceDependencies,
    session: &Session,
    new_item: NewItem,
) -> Result<Item> {
    if !session.is_admin() {
        return Err(CatalogError::NotAuthorized);
    }

    if let Err(errors) = new_item.validate() {
        let fields = errors.field_errors();
        if fields.contains_key("title") {
            return Err(CatalogError::InvalidTitle);
        }
        return Err(CatalogError::InvalidCreator);
    }

    match new_item.isbn.as_deref() {
        Some(isbn) if !is_valid_isbn(isbn) => return Err(CatalogError::InvalidIsbn),
        None if new_item.kind == ItemKind::Book => return Err(CatalogError::InvalidIsbn),
        _ => {}
    }

    let NewItem {
        kind,
        title,
        creator,
        isbn,
        genre,
    } = new_item;
    let mut item = Item::new(kind, title, creator, deps.clock.now());
    item.isbn = isbn;
    item.genre = genre;

    deps.catalog
        .save(&mut item)
        .await
        .map_err(CatalogError::Persistence)?;

    tracing::info!("Added {} \"{}\" by {}", kind.label(), item.title, session.user_id());
    Ok(item)
}

/// 種別ごとの全資料
pub async fn list_items(deps: &ServiceDependencies, kind: ItemKind) -> Vec<Item> {
    deps.catalog.find_all(kind).await
}

/// タイトル・著者・ISBN・ジャンルの部分一致検索
pub async fn search_items(deps: &ServiceDependencies, kind: ItemKind, query: &str) -> Vec<Item> {
    deps.catalog.search(kind, query).await
}

pub async fn items_by_creator(
    deps: &ServiceDependencies,
    kind: ItemKind,
    creator: &str,
) -> Vec<Item> {
    deps.catalog.find_by_creator(kind, creator).await
}

pub async fn items_by_genre(deps: &ServiceDependencies, kind: ItemKind, genre: &str) -> Vec<Item> {
    deps.catalog.find_by_genre(kind, genre).await
}
