use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use validator::{Validate, ValidationErrors};

use super::{Role, UserId, timestamp};

/// 利用者
///
/// メールアドレスが業務上の一意キー。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: NaiveDateTime,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
        now: NaiveDateTime,
    ) -> Self {
        let now = timestamp::truncate(now);
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self, now: NaiveDateTime) {
        self.updated_at = timestamp::truncate(now);
    }
}

/// 操作主体のコンテキスト
///
/// ログイン成功時に作成され、本人確認が必要な操作へ明示的に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    role: Role,
}

impl Session {
    /// 保存済みの利用者からセッションを作る（IDがなければNone）
    pub fn for_user(user: &User) -> Option<Self> {
        user.id.clone().map(|user_id| Self {
            user_id,
            role: user.role,
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// 登録時の入力
///
/// 名前は2〜50文字、パスワードは6文字以上、メールアドレスは形式チェックのみ。
#[derive(Debug, Clone, Validate)]
pub struct Registration {
    #[validate(length(min = 2, max = 50))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

impl Registration {
    /// 名前とメールアドレスの前後の空白を除いて作る
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }

    /// 入力を検証し、不正な項目名を返す
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => ["name", "email", "password"]
                .into_iter()
                .filter(|field| has_field(&errors, field))
                .collect(),
        }
    }
}

fn has_field(errors: &ValidationErrors, field: &str) -> bool {
    errors.field_errors().contains_key(field)
}
