use crate::ports::security_service::{Result, SecurityService};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;

/// Argon2によるパスワードハッシュ
///
/// ハッシュはPHC文字列形式（ソルトとパラメータを含む）で保存される。
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2SecurityService;

impl Argon2SecurityService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SecurityService for Argon2SecurityService {
    async fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| format!("Password hashing failed: {}", e))?
            .to_string();
        Ok(hash)
    }

    async fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(password_hash) else {
            tracing::warn!("Stored password hash is not a valid PHC string");
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
