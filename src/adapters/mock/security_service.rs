use crate::ports::security_service::{Result, SecurityService as SecurityServiceTrait};
use async_trait::async_trait;

/// Mock implementation of SecurityService
///
/// Uses a reversible marker instead of a real hash so tests stay fast.
#[derive(Debug, Default, Clone, Copy)]
pub struct SecurityService;

impl SecurityService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SecurityServiceTrait for SecurityService {
    async fn hash_password(&self, password: &str) -> Result<String> {
        Ok(format!("plain:{}", password))
    }

    async fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        password_hash.strip_prefix("plain:") == Some(password)
    }
}
