//! 環境変数からのアプリケーション設定

use crate::domain::ItemKind;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// 設定読み込みのエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not a valid {expected}: {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: String },
}

/// 種別ごとの貸出方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackPolicy {
    pub loan_period_days: i64,
    pub fine_per_day: Decimal,
}

/// 貸出方針（書籍・CD）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LendingPolicy {
    pub book: TrackPolicy,
    pub cd: TrackPolicy,
    /// 未払いの延滞料金がある利用者への貸出を拒否するか
    pub block_on_outstanding_fines: bool,
}

impl LendingPolicy {
    pub fn track(&self, kind: ItemKind) -> TrackPolicy {
        match kind {
            ItemKind::Book => self.book,
            ItemKind::Cd => self.cd,
        }
    }
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            book: TrackPolicy {
                loan_period_days: 28,
                fine_per_day: Decimal::from(10),
            },
            cd: TrackPolicy {
                loan_period_days: 7,
                fine_per_day: Decimal::from(20),
            },
            block_on_outstanding_fines: true,
        }
    }
}

/// メール送信設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub enable_tls: bool,
}

impl EmailConfig {
    /// 実送信に必要な項目がそろっているか
    pub fn is_valid(&self) -> bool {
        !self.host.trim().is_empty()
            && self.port > 0
            && !self.username.trim().is_empty()
            && !self.password.is_empty()
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 587,
            username: String::new(),
            password: String::new(),
            enable_tls: true,
        }
    }
}

/// アプリケーション設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub policy: LendingPolicy,
    pub return_reminder_days: i64,
    pub email_real_mode: bool,
    pub outbox_path: PathBuf,
    pub email: EmailConfig,
}

impl AppConfig {
    /// 環境変数から読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から読み込む（未設定の項目はデフォルト値）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = LendingPolicy::default();

        let data_dir = PathBuf::from(lookup("LIBRARY_DATA_DIR").unwrap_or_else(|| "data".into()));

        let policy = LendingPolicy {
            book: TrackPolicy {
                loan_period_days: positive(
                    &lookup,
                    "LIBRARY_BOOK_LOAN_DAYS",
                    defaults.book.loan_period_days,
                )?,
                fine_per_day: positive(
                    &lookup,
                    "LIBRARY_BOOK_FINE_PER_DAY",
                    defaults.book.fine_per_day,
                )?,
            },
            cd: TrackPolicy {
                loan_period_days: positive(
                    &lookup,
                    "LIBRARY_CD_LOAN_DAYS",
                    defaults.cd.loan_period_days,
                )?,
                fine_per_day: positive(
                    &lookup,
                    "LIBRARY_CD_FINE_PER_DAY",
                    defaults.cd.fine_per_day,
                )?,
            },
            block_on_outstanding_fines: parse_bool(
                &lookup,
                "LIBRARY_BLOCK_ON_FINES",
                defaults.block_on_outstanding_fines,
            )?,
        };

        let outbox_path = lookup("LIBRARY_OUTBOX")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("outbox.jsonl"));

        let email = EmailConfig {
            host: lookup("SMTP_HOST").unwrap_or_default(),
            port: parse(&lookup, "SMTP_PORT", "port number", EmailConfig::default().port)?,
            username: lookup("SMTP_USERNAME").unwrap_or_default(),
            password: lookup("SMTP_PASSWORD").unwrap_or_default(),
            enable_tls: parse_bool(&lookup, "SMTP_TLS", true)?,
        };

        Ok(Self {
            data_dir,
            policy,
            return_reminder_days: positive(&lookup, "LIBRARY_RETURN_REMINDER_DAYS", 3)?,
            email_real_mode: parse_bool(&lookup, "LIBRARY_EMAIL_REAL_MODE", false)?,
            outbox_path,
            email,
        })
    }
}

fn parse<F, T>(lookup: &F, name: &'static str, expected: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

fn positive<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default + ToString,
{
    let value = parse(lookup, name, "number", default)?;
    if value <= T::default() {
        return Err(ConfigError::NotPositive {
            name,
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn parse_bool<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(name) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "boolean",
            value,
        }),
    }
}
