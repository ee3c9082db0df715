use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// 空文字列は「未指定」として扱う
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

string_id!(
    /// 利用者ID
    UserId
);
string_id!(
    /// 資料ID（書籍・CD共通）
    ItemId
);
string_id!(
    /// 貸出ID
    LoanId
);
string_id!(
    /// 延滞料金ID
    FineId
);

/// 資料の種別
///
/// 書籍とCDは同じ貸出・延滞料金パイプラインを共有し、種別ごとに
/// 独立したストアと延滞クエリを持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemKind {
    Book,
    Cd,
}

impl ItemKind {
    pub const ALL: [ItemKind; 2] = [ItemKind::Book, ItemKind::Cd];

    /// 資料IDの接頭辞
    pub fn item_prefix(&self) -> &'static str {
        match self {
            ItemKind::Book => "BOOK",
            ItemKind::Cd => "CD",
        }
    }

    /// 貸出IDの接頭辞
    pub fn loan_prefix(&self) -> &'static str {
        match self {
            ItemKind::Book => "LOAN",
            ItemKind::Cd => "CDLOAN",
        }
    }

    /// 延滞料金IDの接頭辞
    pub fn fine_prefix(&self) -> &'static str {
        match self {
            ItemKind::Book => "FINE",
            ItemKind::Cd => "CDFINE",
        }
    }

    /// 通知文面用の表示名
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Book => "book",
            ItemKind::Cd => "CD",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 利用者の権限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Regular,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "REGULAR" | "USER" | "MEMBER" => Ok(Role::Regular),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}
