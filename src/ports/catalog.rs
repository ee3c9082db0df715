use crate::domain::{Item, ItemId, ItemKind};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 資料カタログポート
///
/// 貸出コンテキストとカタログコンテキストの境界を維持する。
/// 貸出コンテキストが使うのは貸出可否の確認・更新とタイトルの取得のみ。
/// 検索系は全件取得の上に既定実装を持つ。
#[async_trait]
pub trait Catalog: Send + Sync {
    /// 資料を保存する（IDがなければ割り当てる）
    async fn save(&self, item: &mut Item) -> Result<()>;

    /// IDで資料を取得する
    async fn find(&self, kind: ItemKind, item_id: &ItemId) -> Option<Item>;

    /// 種別ごとの全資料を取得する（ID順）
    async fn find_all(&self, kind: ItemKind) -> Vec<Item>;

    /// 貸出可否を更新する
    ///
    /// 資料が存在しない場合は `Ok(false)`。
    async fn set_available(&self, kind: ItemKind, item_id: &ItemId, available: bool)
    -> Result<bool>;

    /// 資料が貸出可能か確認する
    async fn is_available(&self, kind: ItemKind, item_id: &ItemId) -> bool {
        self.find(kind, item_id)
            .await
            .is_some_and(|item| item.available)
    }

    /// 資料タイトルを取得する
    ///
    /// 通知メッセージでわかりやすい表示をするために使用される。
    async fn title(&self, kind: ItemKind, item_id: &ItemId) -> Option<String> {
        self.find(kind, item_id).await.map(|item| item.title)
    }

    /// タイトル・著者・ISBN・ジャンルの部分一致で検索する
    async fn search(&self, kind: ItemKind, query: &str) -> Vec<Item> {
        let mut items = self.find_all(kind).await;
        items.retain(|item| item.matches(query));
        items
    }

    /// 著者（CDはアーティスト）で検索する
    async fn find_by_creator(&self, kind: ItemKind, creator: &str) -> Vec<Item> {
        let mut items = self.find_all(kind).await;
        items.retain(|item| item.is_by(creator));
        items
    }

    /// ジャンルで検索する
    async fn find_by_genre(&self, kind: ItemKind, genre: &str) -> Vec<Item> {
        let mut items = self.find_all(kind).await;
        items.retain(|item| item.is_in_genre(genre));
        items
    }
}
