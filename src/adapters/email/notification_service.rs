use crate::config::EmailConfig;
use crate::domain::timestamp;
use crate::ports::notification_service::NotificationService as NotificationServiceTrait;
use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::AsyncWriteExt;

/// 送信待ちメッセージ（outboxの1行）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutboxMessage<'a> {
    to: &'a str,
    subject: &'a str,
    body: &'a str,
    smtp_host: &'a str,
    queued_at: String,
}

/// 通知サービスの状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailStatus {
    pub real_mode: bool,
    pub enabled: bool,
    pub config_valid: bool,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub enable_tls: bool,
}

impl fmt::Display for EmailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Mode: {}",
            if self.real_mode { "REAL" } else { "MOCK" }
        )?;
        writeln!(f, "Enabled: {}", self.enabled)?;
        writeln!(f, "Config valid: {}", self.config_valid)?;
        if self.host.is_empty() {
            write!(f, "SMTP: (not configured)")
        } else {
            write!(
                f,
                "SMTP: {}@{}:{} (TLS: {})",
                self.username, self.host, self.port, self.enable_tls
            )
        }
    }
}

/// メール通知サービス
///
/// - モックモード：ログに出力して成功を返す
/// - 実送信モード：有効な設定が必要。メッセージをoutboxファイルにJSON Linesで追記する
///
/// 配信の失敗は `false` で返す。
pub struct EmailNotificationService {
    config: Mutex<EmailConfig>,
    outbox_path: PathBuf,
    real_mode: AtomicBool,
    enabled: AtomicBool,
}

impl EmailNotificationService {
    /// モックモードで作成する
    pub fn new(config: EmailConfig, outbox_path: impl Into<PathBuf>) -> Self {
        Self {
            config: Mutex::new(config),
            outbox_path: outbox_path.into(),
            real_mode: AtomicBool::new(false),
            enabled: AtomicBool::new(true),
        }
    }

    pub fn outbox_path(&self) -> &Path {
        &self.outbox_path
    }

    pub fn email_config(&self) -> EmailConfig {
        self.config
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_email_config(&self, config: EmailConfig) {
        *self
            .config
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = config;
    }

    /// 設定が有効な場合のみ実送信モードに切り替える
    pub fn enable_real_mode(&self) -> bool {
        if !self.email_config().is_valid() {
            tracing::warn!("Email configuration is invalid, staying in mock mode");
            return false;
        }
        self.real_mode.store(true, Ordering::SeqCst);
        tracing::info!("Email service switched to real mode");
        true
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn status(&self) -> EmailStatus {
        let config = self.email_config();
        EmailStatus {
            real_mode: self.is_real_mode(),
            enabled: self.is_enabled(),
            config_valid: config.is_valid(),
            host: config.host,
            port: config.port,
            username: config.username,
            enable_tls: config.enable_tls,
        }
    }

    async fn append_to_outbox(&self, message: &OutboxMessage<'_>) -> std::io::Result<()> {
        let mut line = serde_json::to_string(message)?;
        line.push('\n');

        if let Some(parent) = self.outbox_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.outbox_path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

#[async_trait]
impl NotificationServiceTrait for EmailNotificationService {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> bool {
        if !self.is_enabled() {
            tracing::debug!("Email service disabled, not sending to {}", to);
            return false;
        }

        if !self.is_real_mode() {
            tracing::info!("[MOCK EMAIL] to={} subject={:?}", to, subject);
            tracing::debug!("[MOCK EMAIL] body:\n{}", body);
            return true;
        }

        let config = self.email_config();
        if !config.is_valid() {
            tracing::warn!("Cannot send email to {}: configuration is invalid", to);
            return false;
        }

        let message = OutboxMessage {
            to,
            subject,
            body,
            smtp_host: &config.host,
            queued_at: timestamp::format(&Local::now().naive_local()),
        };

        match self.append_to_outbox(&message).await {
            Ok(()) => {
                tracing::info!("Queued email to {} subject={:?}", to, subject);
                true
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to queue email to {} in {}: {}",
                    to,
                    self.outbox_path.display(),
                    e
                );
                false
            }
        }
    }

    fn is_real_mode(&self) -> bool {
        self.real_mode.load(Ordering::SeqCst)
    }

    fn set_real_mode(&self, real_mode: bool) {
        self.real_mode.store(real_mode, Ordering::SeqCst);
    }
}
