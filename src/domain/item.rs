use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{ItemId, ItemKind, timestamp};

/// 貸出対象の資料（書籍またはCD）
///
/// 貸出コンテキストが必要とするのは貸出可否とタイトルのみ。
/// ISBNとジャンルは検索のための任意項目。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    pub kind: ItemKind,
    pub title: String,
    /// 著者（書籍）またはアーティスト（CD）
    #[serde(default)]
    pub creator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: NaiveDateTime,
}

fn default_available() -> bool {
    true
}

impl Item {
    pub fn new(
        kind: ItemKind,
        title: impl Into<String>,
        creator: impl Into<String>,
        now: NaiveDateTime,
    ) -> Self {
        let now = timestamp::truncate(now);
        Self {
            id: None,
            kind,
            title: title.into(),
            creator: creator.into(),
            isbn: None,
            genre: None,
            available: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// タイトル・著者・ISBN・ジャンルのいずれかに検索語を含むか（大文字小文字を区別しない）
    ///
    /// 空白のみの検索語はすべての資料に一致する。
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        [Some(&self.title), Some(&self.creator), self.isbn.as_ref(), self.genre.as_ref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&query))
    }

    /// 著者（アーティスト）が一致するか（大文字小文字を区別しない）
    pub fn is_by(&self, creator: &str) -> bool {
        self.creator.to_lowercase() == creator.trim().to_lowercase()
    }

    /// ジャンルが一致するか（大文字小文字を区別しない）
    pub fn is_in_genre(&self, genre: &str) -> bool {
        self.genre
            .as_deref()
            .is_some_and(|own| own.to_lowercase() == genre.trim().to_lowercase())
    }
}

/// ISBNの妥当性
///
/// ハイフンと空白を除いた10桁（末尾は `X` 可）または13桁で、チェックディジットが正しいこと。
pub fn is_valid_isbn(isbn: &str) -> bool {
    let chars: Vec<char> = isbn
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();

    match chars.len() {
        10 => {
            let mut sum = 0;
            for (i, c) in chars.iter().enumerate() {
                let digit = match c.to_digit(10) {
                    Some(d) => d,
                    None if i == 9 && matches!(c, 'X' | 'x') => 10,
                    None => return false,
                };
                sum += digit * (10 - i as u32);
            }
            sum % 11 == 0
        }
        13 => {
            let Some(digits) = chars.iter().map(|c| c.to_digit(10)).collect::<Option<Vec<_>>>()
            else {
                return false;
            };
            let sum: u32 = digits
                .iter()
                .enumerate()
                .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
                .sum();
            sum % 10 == 0
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_isbn_validation() {
        assert!(is_valid_isbn("9781234567897"));
        assert!(is_valid_isbn("978-1-234-56789-7"));
        assert!(is_valid_isbn("0-306-40615-2"));
        assert!(is_valid_isbn("080442957X"));
        assert!(!is_valid_isbn("9781234567890"));
        assert!(!is_valid_isbn("111"));
        assert!(!is_valid_isbn(""));
        assert!(!is_valid_isbn("   "));
        assert!(!is_valid_isbn("97812345678X7"));
    }

    #[test]
    fn test_matches_any_text_field() {
        let cd = Item::new(ItemKind::Cd, "Another Rock", "Queen", now()).with_genre("Classic");

        assert!(cd.matches("rock"));
        assert!(cd.matches("QUEEN"));
        assert!(cd.matches("class"));
        assert!(cd.matches("  "));
        assert!(!cd.matches("jazz"));
    }

    #[test]
    fn test_creator_and_genre_are_exact_ignoring_case() {
        let cd = Item::new(ItemKind::Cd, "A1", "Queen", now()).with_genre("Rock");

        assert!(cd.is_by("queen"));
        assert!(!cd.is_by("Que"));
        assert!(cd.is_in_genre("ROCK"));
        assert!(!cd.is_in_genre("Roc"));
        assert!(!Item::new(ItemKind::Cd, "A2", "Queen", now()).is_in_genre("Rock"));
    }

    #[test]
    fn test_optional_fields_are_omitted_from_json() {
        let book = Item::new(ItemKind::Book, "Dune", "Herbert", now());
        let json = serde_json::to_value(&book).unwrap();
        assert!(json.get("isbn").is_none());
        assert!(json.get("genre").is_none());

        let book = book.with_isbn("9781234567897");
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["isbn"], "9781234567897");
    }
}
