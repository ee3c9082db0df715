use crate::ports::notification_service::NotificationService as NotificationServiceTrait;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// A message captured by the mock notification service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mock implementation of NotificationService
///
/// Records every successful send instead of delivering it.
/// Can be switched to fail so callers' best-effort handling can be tested.
pub struct NotificationService {
    sent: Mutex<Vec<SentEmail>>,
    real_mode: AtomicBool,
    failing: AtomicBool,
}

impl NotificationService {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            real_mode: AtomicBool::new(false),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every following send fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages sent so far
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, address: &str) -> Vec<SentEmail> {
        self.sent()
            .into_iter()
            .filter(|email| email.to == address)
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> bool {
        if self.failing.load(Ordering::SeqCst) {
            return false;
        }

        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        true
    }

    fn is_real_mode(&self) -> bool {
        self.real_mode.load(Ordering::SeqCst)
    }

    fn set_real_mode(&self, real_mode: bool) {
        self.real_mode.store(real_mode, Ordering::SeqCst);
    }
}
