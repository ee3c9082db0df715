use crate::domain::user::Registration;
use crate::domain::{ItemKind, Role, Session, User, UserId};

use super::errors::{AccountError, Result};
use crate::application::ServiceDependencies;

/// 利用者を登録する
///
/// ビジネスルール：
/// - 名前は2〜50文字、パスワードは6文字以上
/// - メールアドレスは形式が正しく、未登録であること
///
/// 登録後に歓迎メールを送信する（送信失敗は登録結果に影響しない）。
pub async fn register_user(
    deps: &ServiceDependencies,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<User> {
    let registration = Registration::new(name, email, password);
    match registration.invalid_fields().first() {
        Some(&"name") => return Err(AccountError::InvalidName),
        Some(&"email") => return Err(AccountError::InvalidEmail),
        Some(_) => return Err(AccountError::WeakPassword),
        None => {}
    }
    let Registration { name, email, .. } = &registration;

    if deps.users.find_by_email(email).await.is_some() {
        return Err(AccountError::EmailTaken);
    }

    let password_hash = deps
        .security
        .hash_password(password)
        .await
        .map_err(AccountError::Security)?;

    let mut user = User::new(name, email, password_hash, role, deps.clock.now());
    deps.users
        .save(&mut user)
        .await
        .map_err(AccountError::Persistence)?;

    tracing::info!("Registered {:?} user {}", role, email);

    if !deps.notifier.send_welcome_email(&user, None).await {
        tracing::warn!("Welcome email to {} was not delivered", email);
    }

    Ok(user)
}

/// ログインしてセッションを得る
pub async fn login(deps: &ServiceDependencies, email: &str, password: &str) -> Result<Session> {
    let user = deps
        .users
        .find_by_email(email.trim())
        .await
        .ok_or(AccountError::InvalidCredentials)?;

    if !deps
        .security
        .verify_password(password, &user.password_hash)
        .await
    {
        tracing::debug!("Login rejected for {}", email);
        return Err(AccountError::InvalidCredentials);
    }
    if !user.active {
        return Err(AccountError::UserInactive);
    }

    Session::for_user(&user).ok_or(AccountError::UserNotFound)
}

/// 利用者の有効・無効を切り替える（管理者のみ）
pub async fn set_user_active(
    deps: &ServiceDependencies,
    session: &Session,
    user_id: &UserId,
    active: bool,
) -> Result<User> {
    if !session.is_admin() {
        return Err(AccountError::NotAuthorized);
    }

    let mut user = deps
        .users
        .find_by_id(user_id)
        .await
        .ok_or(AccountError::UserNotFound)?;

    user.active = active;
    user.touch(deps.clock.now());
    deps.users
        .save(&mut user)
        .await
        .map_err(AccountError::Persistence)?;

    tracing::info!("User {} set active={} by {}", user_id, active, session.user_id());
    Ok(user)
}

/// 利用者を削除する（管理者のみ）
///
/// 未返却の貸出または未払いの延滞料金がある利用者は削除できない。
pub async fn delete_user(
    deps: &ServiceDependencies,
    session: &Session,
    user_id: &UserId,
) -> Result<()> {
    if !session.is_admin() {
        return Err(AccountError::NotAuthorized);
    }
    if deps.users.find_by_id(user_id).await.is_none() {
        return Err(AccountError::UserNotFound);
    }

    for kind in ItemKind::ALL {
        let has_open_loan = deps
            .loans
            .find_by_user_id(kind, user_id)
            .await
            .iter()
            .any(|loan| !loan.is_returned);
        let has_unpaid_fine = deps
            .fines
            .find_by_user_id(kind, user_id)
            .await
            .iter()
            .any(|fine| fine.is_unpaid());

        if has_open_loan || has_unpaid_fine {
            tracing::debug!("Refusing to delete {}: open {} obligations", user_id, kind.label());
            return Err(AccountError::HasOpenObligations);
        }
    }

    deps.users
        .delete(user_id)
        .await
        .map_err(AccountError::Persistence)?;

    tracing::info!("User {} deleted by {}", user_id, session.user_id());
    Ok(())
}

/// 利用者数の集計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserStatistics {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub admins: usize,
    pub regular: usize,
}

impl std::fmt::Display for UserStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total Users: {}", self.total)?;
        writeln!(f, "Active Users: {}", self.active)?;
        writeln!(f, "Inactive Users: {}", self.inactive)?;
        writeln!(f, "Admin Users: {}", self.admins)?;
        write!(f, "Regular Users: {}", self.regular)
    }
}

/// 利用者数を集計する（管理者のみ）
pub async fn user_statistics(
    deps: &ServiceDependencies,
    session: &Session,
) -> Result<UserStatistics> {
    if !session.is_admin() {
        return Err(AccountError::NotAuthorized);
    }

    let stats = deps
        .users
        .find_all()
        .await
        .iter()
        .fold(UserStatistics::default(), |mut stats, user| {
            stats.total += 1;
            if user.active {
                stats.active += 1;
            } else {
                stats.inactive += 1;
            }
            if user.role.is_admin() {
                stats.admins += 1;
            } else {
                stats.regular += 1;
            }
            stats
        });
    Ok(stats)
}
